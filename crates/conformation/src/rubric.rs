//! The official 20-trait type classification rubric (Annex II).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use ts_rs::TS;

/// Rubric section; declaration order is the order sections appear in a record
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema, TS,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, PartialOrd, Ord, Hash
)]
#[ts(export)]
pub enum Section {
    Strength,
    Rump,
    #[serde(rename = "Feet and Leg")]
    #[strum(serialize = "Feet and Leg")]
    FeetAndLeg,
    Udder,
    General,
}

/// Unit a trait's measurement is declared in by the rubric
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MeasurementUnit {
    Cm,
    Degrees,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TraitDefinition {
    pub name: &'static str,
    pub section: Section,
    pub low_descriptor: &'static str,
    pub high_descriptor: &'static str,
    pub measurement_unit: Option<MeasurementUnit>,
    pub description: &'static str,
}

const fn def(
    name: &'static str,
    section: Section,
    low_descriptor: &'static str,
    high_descriptor: &'static str,
    measurement_unit: Option<MeasurementUnit>,
    description: &'static str,
) -> TraitDefinition {
    TraitDefinition {
        name,
        section,
        low_descriptor,
        high_descriptor,
        measurement_unit,
        description,
    }
}

use MeasurementUnit::{Cm, Degrees};
use Section::*;

/// Every official trait, grouped by section in rubric order
pub const RUBRIC: [TraitDefinition; 20] = [
    def("Stature", Strength, "Short", "Tall", Some(Cm), "Overall height and frame size"),
    def("Heart Girth", Strength, "Narrow", "Wide", Some(Cm), "Chest depth and width capacity"),
    def("Body Length", Strength, "Short", "Long", Some(Cm), "Distance from shoulder to pin bone"),
    def("Body Depth", Strength, "Shallow", "Deep", Some(Cm), "Rib depth and barrel capacity"),
    def("Angularity", Strength, "Non-angular", "Angular", None, "Overall dairy character and sharpness"),
    def("Rump Angle", Rump, "High", "Low", Some(Degrees), "Slope from hips to pin bones"),
    def("Rump Width", Rump, "Narrow", "Wide", Some(Cm), "Distance between pin bones"),
    def("Rear Legs Set", FeetAndLeg, "Straight", "Curved", None, "Angle of rear legs from side view"),
    def("Rear Legs Rear View", FeetAndLeg, "Hocked-in", "Straight", None, "Straightness from rear view"),
    def("Foot Angle", FeetAndLeg, "Low", "Steep", Some(Degrees), "Hoof slope angle"),
    def("Fore Udder Attachment", Udder, "Weak", "Strong", None, "Strength of front attachment to body wall"),
    def("Rear Udder Height", Udder, "Low", "High", Some(Cm), "Height of rear attachment above hock"),
    def("Central Ligament", Udder, "Weak", "Strong", None, "Strength of median suspensory ligament"),
    def("Udder Depth", Udder, "Deep", "Shallow", Some(Cm), "Distance from hock to udder floor"),
    def("Front Teat Placement", Udder, "Wide", "Close", Some(Cm), "Distance between front teats"),
    def("Teat Length", Udder, "Short", "Long", Some(Cm), "Length of teats"),
    def("Rear Teat Placement", Udder, "Wide", "Close", Some(Cm), "Distance between rear teats"),
    def("Rear udder width", Udder, "Narrow", "Wide", Some(Cm), "Width at rear attachment"),
    def("Teat thickness", Udder, "Thin", "Thick", Some(Cm), "Diameter of teats"),
    def("Body condition score", General, "Thin", "Fatty", None, "Overall body fat coverage (1-5 BCS scale)"),
];

/// Canonical name of the body condition trait
pub const BODY_CONDITION_SCORE: &str = "Body condition score";

pub fn find(name: &str) -> Option<&'static TraitDefinition> {
    RUBRIC.iter().find(|d| d.name == name)
}

pub fn section_traits(section: Section) -> impl Iterator<Item = &'static TraitDefinition> {
    RUBRIC.iter().filter(move |d| d.section == section)
}
