use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// HTTP verbs that can be assigned to a controller method.
///
/// `All` is the wildcard verb (`*`): the consuming router should register the
/// method for every verb it supports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Patch,
    #[strum(to_string = "*", serialize = "ALL")]
    #[serde(rename = "*")]
    All,
}
