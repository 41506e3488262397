//! Accessor generators shared by the model types.
//!
//! Each entity keeps its fields crate-private and exposes the same surface:
//! a getter, a `set_*` mutator returning the owner, and a consuming `with_*`
//! builder. Collections add `add_*` / `remove_*`, where removal of a missing
//! entry is a no-op.

macro_rules! string_field {
    ($($field:ident, $set:ident, $with:ident;)*) => {
        $(
            pub fn $field(&self) -> Option<&str> {
                self.$field.as_deref()
            }

            pub fn $set(&mut self, value: Option<String>) -> &mut Self {
                self.$field = value;
                self
            }

            pub fn $with(mut self, value: impl Into<String>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )*
    };
}

macro_rules! flag_field {
    ($($field:ident, $set:ident, $with:ident;)*) => {
        $(
            pub fn $field(&self) -> Option<bool> {
                self.$field
            }

            pub fn $set(&mut self, value: Option<bool>) -> &mut Self {
                self.$field = value;
                self
            }

            pub fn $with(mut self, value: bool) -> Self {
                self.$field = Some(value);
                self
            }
        )*
    };
}

macro_rules! value_field {
    ($($field:ident: $ty:ty, $set:ident, $with:ident;)*) => {
        $(
            pub fn $field(&self) -> Option<&$ty> {
                self.$field.as_ref()
            }

            pub fn $set(&mut self, value: Option<$ty>) -> &mut Self {
                self.$field = value;
                self
            }

            pub fn $with(mut self, value: impl Into<$ty>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )*
    };
}

macro_rules! list_field {
    ($($field:ident: $ty:ty, $set:ident, $add:ident, $remove:ident;)*) => {
        $(
            pub fn $field(&self) -> &[$ty] {
                &self.$field
            }

            pub fn $set(&mut self, items: Vec<$ty>) -> &mut Self {
                self.$field = items;
                self
            }

            pub fn $add(&mut self, item: impl Into<$ty>) -> &mut Self {
                self.$field.push(item.into());
                self
            }

            pub fn $remove(&mut self, item: &$ty) -> &mut Self {
                self.$field.retain(|existing| existing != item);
                self
            }
        )*
    };
}

macro_rules! map_field {
    ($($field:ident: $ty:ty, $set:ident, $add:ident, $remove:ident;)*) => {
        $(
            pub fn $field(&self) -> &indexmap::IndexMap<String, $ty> {
                &self.$field
            }

            pub fn $set(&mut self, entries: indexmap::IndexMap<String, $ty>) -> &mut Self {
                self.$field = entries;
                self
            }

            pub fn $add(&mut self, key: impl Into<String>, value: $ty) -> &mut Self {
                self.$field.insert(key.into(), value);
                self
            }

            pub fn $remove(&mut self, key: &str) -> &mut Self {
                self.$field.shift_remove(key);
                self
            }
        )*
    };
}

macro_rules! impl_extensible {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::model::extensions::Extensible for $ty {
                fn extensions(&self) -> &$crate::model::extensions::Extensions {
                    &self.extensions
                }

                fn extensions_mut(&mut self) -> &mut $crate::model::extensions::Extensions {
                    &mut self.extensions
                }
            }
        )*
    };
}

macro_rules! impl_referenceable {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl $crate::model::reference::Referenceable for $ty {
                const KIND: $crate::model::reference::ComponentKind = $kind;

                fn ref_path(&self) -> Option<&str> {
                    self.ref_path.as_deref()
                }

                fn set_ref_path(&mut self, target: Option<String>) -> &mut Self {
                    self.ref_path = target;
                    self
                }
            }
        )*
    };
}

/// `example` and `examples` are mutually exclusive: whichever is set last
/// clears the other.
macro_rules! example_fields {
    () => {
        pub fn example(&self) -> Option<&serde_json::Value> {
            self.example.as_ref()
        }

        pub fn set_example(&mut self, value: Option<serde_json::Value>) -> &mut Self {
            if value.is_some() {
                self.examples.clear();
            }
            self.example = value;
            self
        }

        pub fn with_example(mut self, value: impl Into<serde_json::Value>) -> Self {
            self.set_example(Some(value.into()));
            self
        }

        pub fn examples(&self) -> &indexmap::IndexMap<String, $crate::model::media::Example> {
            &self.examples
        }

        pub fn set_examples(
            &mut self,
            examples: indexmap::IndexMap<String, $crate::model::media::Example>,
        ) -> &mut Self {
            if !examples.is_empty() {
                self.example = None;
            }
            self.examples = examples;
            self
        }

        pub fn add_example(
            &mut self,
            key: impl Into<String>,
            example: $crate::model::media::Example,
        ) -> &mut Self {
            self.example = None;
            self.examples.insert(key.into(), example);
            self
        }

        pub fn remove_example(&mut self, key: &str) -> &mut Self {
            self.examples.shift_remove(key);
            self
        }

        /// Restore exclusivity on values built without the setters, keeping
        /// `examples`.
        pub(crate) fn settle_examples(&mut self) {
            if self.example.is_some() && !self.examples.is_empty() {
                log::warn!("both `example` and `examples` set; keeping `examples`");
                self.example = None;
            }
        }
    };
}
