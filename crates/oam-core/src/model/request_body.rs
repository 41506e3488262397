use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::media::{Content, MediaType};
use super::reference::ComponentKind;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) content: Content,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) required: Option<bool>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl RequestBody {
    string_field! {
        description, set_description, with_description;
    }

    flag_field! {
        required, set_required, with_required;
    }

    map_field! {
        content: MediaType, set_content, add_content, remove_content;
    }

    pub fn with_content(mut self, media_type: impl Into<String>, media: MediaType) -> Self {
        self.content.insert(media_type.into(), media);
        self
    }

    pub(crate) fn normalize(&mut self) {
        for media in self.content.values_mut() {
            media.settle_examples();
        }
    }
}

impl_extensible!(RequestBody);
impl_referenceable!(RequestBody => ComponentKind::RequestBodies);
