//! Open Graph type → schema classification.
//!
//! Every `og:type` value belongs to at most one coarse schema. The table is
//! static and never mutated at runtime.

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Coarse category grouping several fine-grained `og:type` values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumIter,
    EnumString,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// Activities and sports
    Activity,
    /// Bars, cafes, hotels and other businesses
    Business,
    /// Causes, leagues and teams
    Group,
    /// Bands, schools and other organizations
    Organization,
    /// People
    Person,
    /// Cities, countries and landmarks
    Place,
    /// Books, films, music and other products
    Product,
    /// Websites, blogs and articles
    Website,
}

impl Schema {
    /// Lowercase schema name, e.g. `"business"`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The `og:type` values admitted by this schema.
    pub fn types(self) -> &'static [&'static str] {
        match self {
            Schema::Activity => &["activity", "sport"],
            Schema::Business => &["bar", "company", "cafe", "hotel", "restaurant"],
            Schema::Group => &["cause", "sports_league", "sports_team"],
            Schema::Organization => &["band", "government", "non_profit", "school", "university"],
            Schema::Person => &[
                "actor",
                "athlete",
                "author",
                "director",
                "musician",
                "politician",
                "public_figure",
            ],
            Schema::Place => &["city", "country", "landmark", "state_province"],
            Schema::Product => &[
                "album", "book", "drink", "food", "game", "movie", "product", "song", "tv_show",
            ],
            Schema::Website => &["blog", "website"],
        }
    }

    /// Returns whether `og_type` is one of this schema's admitted types.
    pub fn admits(self, og_type: &str) -> bool {
        self.types().contains(&og_type)
    }

    /// Classifies an `og:type` value.
    ///
    /// Returns `None` when no schema admits the type. Matching is exact and
    /// case-sensitive; the first entry of a schema's list matches like any other.
    pub fn for_type(og_type: &str) -> Option<Schema> {
        Schema::iter().find(|schema| schema.admits(og_type))
    }
}
