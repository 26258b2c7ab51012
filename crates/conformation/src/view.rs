use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use ts_rs::TS;

/// The five fixed camera angles of a classification request.
///
/// Declaration order is the merge priority: later views override earlier
/// ones when they report the same trait, so `Ord` follows it too.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema, TS,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, PartialOrd, Ord, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[ts(export)]
pub enum View {
    Rear,
    Side,
    Top,
    Udder,
    SideUdder,
}

impl View {
    /// All views in merge order
    pub const MERGE_ORDER: [View; 5] = [
        View::Rear,
        View::Side,
        View::Top,
        View::Udder,
        View::SideUdder,
    ];

    pub fn view_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }
}
