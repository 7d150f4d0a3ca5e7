//! Typed, validated views over profile attribute maps.
//!
//! A profile is stored on a record set as a plain [`AttributeMap`] whose
//! `type` key names its kind. Each kind here is a read-only projection of
//! such a map: build one with `create`, or recover one from a listing with
//! [`ProfileView::try_view_of`] / [`ProfileView::try_view_of_rrset`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::attributes::{AttributeMap, TYPE_KEY};
use crate::core::record::ResourceRecordSet;
use crate::error::{Error, Result};

pub trait ProfileView: Sized {
    /// Discriminant stored under `type`.
    const KIND: &'static str;

    /// Validates `map` as this kind. Fails with `TypeMismatch` when a
    /// required field is absent or of the wrong shape.
    fn from_attributes(map: &AttributeMap) -> Result<Self>;

    fn attributes(&self) -> &AttributeMap;

    /// `None` when there is no map or it is some other kind.
    fn try_view_of(map: Option<&AttributeMap>) -> Result<Option<Self>> {
        match map {
            Some(map) if map.discriminant() == Some(Self::KIND) => {
                Self::from_attributes(map).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn try_view_of_rrset(rrset: &ResourceRecordSet) -> Result<Option<Self>> {
        Self::try_view_of(rrset.find_profile(Self::KIND))
    }
}

fn check_kind(map: &AttributeMap, kind: &str) -> Result<()> {
    match map.discriminant() {
        Some(found) if found == kind => Ok(()),
        found => Err(Error::TypeMismatch(format!(
            "expected profile type {kind}, found {found:?}"
        ))),
    }
}

/// Record sets with this profile are load balanced by an integer `weight`.
///
/// `0` always serves the record; otherwise the provider-specific range of
/// positive numbers decides the share of load. Some providers only accept
/// even weights, so even numbers in `0..=100` are the most portable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AttributeMap", into = "AttributeMap")]
pub struct Weighted {
    weight: i64,
    attributes: AttributeMap,
}

impl Weighted {
    pub fn create(weight: i64) -> Result<Self> {
        if weight < 0 {
            return Err(Error::InvalidArgument(format!(
                "weight must be non-negative, got {weight}"
            )));
        }
        let attributes = AttributeMap::strict_builder()
            .put(TYPE_KEY, Self::KIND)
            .put("weight", weight)
            .build()?;
        Ok(Self { weight, attributes })
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }
}

impl ProfileView for Weighted {
    const KIND: &'static str = "weighted";

    fn from_attributes(map: &AttributeMap) -> Result<Self> {
        check_kind(map, Self::KIND)?;
        let weight = map
            .get("weight")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                Error::TypeMismatch(format!(
                    "weighted profile needs an integer weight, got {:?}",
                    map.get("weight")
                ))
            })?;
        Self::create(weight)
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Record sets with this profile are served to the listed territories,
/// grouped by region name, in the order given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AttributeMap", into = "AttributeMap")]
pub struct Geo {
    regions: Vec<(String, Vec<String>)>,
    attributes: AttributeMap,
}

impl Geo {
    pub fn create<R, T>(regions: R) -> Result<Self>
    where
        R: IntoIterator<Item = (String, T)>,
        T: IntoIterator<Item = String>,
    {
        let regions: Vec<(String, Vec<String>)> = regions
            .into_iter()
            .map(|(region, territories)| (region, territories.into_iter().collect()))
            .collect();
        if regions.is_empty() {
            return Err(Error::InvalidArgument(
                "geo profile needs at least one region".into(),
            ));
        }
        if regions.iter().any(|(region, _)| region.is_empty()) {
            return Err(Error::InvalidArgument("region names must be non-empty".into()));
        }
        let mut seen = HashSet::new();
        if let Some((region, _)) = regions
            .iter()
            .find(|(region, _)| !seen.insert(region.as_str()))
        {
            return Err(Error::InvalidArgument(format!("region {region} listed twice")));
        }

        let encoded: Map<String, Value> = regions
            .iter()
            .map(|(region, territories)| (region.clone(), Value::from(territories.clone())))
            .collect();
        let attributes = AttributeMap::strict_builder()
            .put(TYPE_KEY, Self::KIND)
            .put("regions", Value::Object(encoded))
            .build()?;
        Ok(Self {
            regions,
            attributes,
        })
    }

    pub fn regions(&self) -> &[(String, Vec<String>)] {
        &self.regions
    }

    pub fn territories(&self, region: &str) -> Option<&[String]> {
        self.regions
            .iter()
            .find(|(name, _)| name == region)
            .map(|(_, t)| t.as_slice())
    }
}

impl ProfileView for Geo {
    const KIND: &'static str = "geo";

    fn from_attributes(map: &AttributeMap) -> Result<Self> {
        check_kind(map, Self::KIND)?;
        let mismatch = || {
            Error::TypeMismatch(
                "geo profile needs regions as a map of string lists".to_string(),
            )
        };
        let regions = map
            .get("regions")
            .and_then(Value::as_object)
            .ok_or_else(mismatch)?;
        let mut decoded = Vec::with_capacity(regions.len());
        for (region, territories) in regions {
            let territories = territories
                .as_array()
                .ok_or_else(mismatch)?
                .iter()
                .map(|t| t.as_str().map(str::to_string).ok_or_else(mismatch))
                .collect::<Result<Vec<_>>>()?;
            decoded.push((region.clone(), territories));
        }
        Self::create(decoded)
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

// Views compare by their backing maps, so equal maps give equal views.
macro_rules! impl_map_conversions {
    ($($view:ty),*) => {$(
        impl PartialEq for $view {
            fn eq(&self, other: &Self) -> bool {
                self.attributes == other.attributes
            }
        }

        impl Eq for $view {}

        impl From<$view> for AttributeMap {
            fn from(view: $view) -> Self {
                view.attributes
            }
        }

        impl TryFrom<AttributeMap> for $view {
            type Error = Error;

            fn try_from(map: AttributeMap) -> Result<Self> {
                <$view as ProfileView>::from_attributes(&map)
            }
        }

        impl AsRef<AttributeMap> for $view {
            fn as_ref(&self) -> &AttributeMap {
                &self.attributes
            }
        }
    )*};
}

impl_map_conversions!(Weighted, Geo);
