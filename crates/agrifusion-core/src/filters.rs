//! Distinct filter values over farmers open for assignment.
//!
//! Consultants browse unassigned farmers by district, state and crop. The
//! option lists for those three filters are computed here from whatever the
//! backend returned, so the result is correct even if the backend query was
//! broader than "unassigned".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::farmer::FarmerListing;

/// Body of `GET /farmers/filters`. Every list is deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmerFilters {
  pub districts: Vec<String>,
  pub states:    Vec<String>,
  pub crops:     Vec<String>,
}

/// Collect the distinct districts, states and crops of every listing that is
/// open for assignment. Values are trimmed; blank values are skipped.
pub fn aggregate<'a, I>(listings: I) -> FarmerFilters
where
  I: IntoIterator<Item = &'a FarmerListing>,
{
  let mut districts = BTreeSet::new();
  let mut states = BTreeSet::new();
  let mut crops = BTreeSet::new();

  for listing in listings
    .into_iter()
    .filter(|l| l.is_open_for_assignment())
  {
    let farmer = &listing.farmer;
    insert_non_blank(&mut districts, farmer.district.as_deref());
    insert_non_blank(&mut states, farmer.state.as_deref());
    for crop in &farmer.current_crops {
      insert_non_blank(&mut crops, Some(crop));
    }
  }

  FarmerFilters {
    districts: districts.into_iter().collect(),
    states:    states.into_iter().collect(),
    crops:     crops.into_iter().collect(),
  }
}

fn insert_non_blank(set: &mut BTreeSet<String>, value: Option<&str>) {
  if let Some(v) = value.map(str::trim)
    && !v.is_empty()
  {
    set.insert(v.to_owned());
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::{farmer::Farmer, profile::ProfileStatus};

  fn listing(
    district: &str,
    state: &str,
    crops: &[&str],
    consultant_id: Option<Uuid>,
    status: ProfileStatus,
  ) -> FarmerListing {
    FarmerListing {
      farmer:         Farmer {
        id: Uuid::new_v4(),
        profile_id: Uuid::new_v4(),
        district: Some(district.to_owned()),
        state: Some(state.to_owned()),
        current_crops: crops.iter().map(|c| (*c).to_owned()).collect(),
        consultant_id,
      },
      profile_status: status,
    }
  }

  #[test]
  fn assigned_farmer_is_excluded() {
    let farmers = vec![
      listing("Pune", "Maharashtra", &["Wheat"], None, ProfileStatus::Active),
      listing(
        "Pune",
        "Maharashtra",
        &["Rice"],
        Some(Uuid::new_v4()),
        ProfileStatus::Active,
      ),
    ];

    let filters = aggregate(&farmers);
    assert_eq!(filters.districts, vec!["Pune"]);
    assert_eq!(filters.crops, vec!["Wheat"]);
  }

  #[test]
  fn rejected_suspended_and_approved_farmers_are_excluded() {
    let farmers = vec![
      listing("Nashik", "Maharashtra", &["Onion"], None, ProfileStatus::Pending),
      listing("Indore", "Madhya Pradesh", &["Soy"], None, ProfileStatus::Rejected),
      listing("Mysuru", "Karnataka", &["Ragi"], None, ProfileStatus::Suspended),
      listing("Guntur", "Andhra Pradesh", &["Chilli"], None, ProfileStatus::Approved),
    ];

    let filters = aggregate(&farmers);
    assert_eq!(filters.districts, vec!["Nashik"]);
    assert_eq!(filters.states, vec!["Maharashtra"]);
    assert_eq!(filters.crops, vec!["Onion"]);
  }

  #[test]
  fn output_is_sorted_and_deduplicated() {
    let farmers = vec![
      listing("Satara", "Maharashtra", &["Wheat", "Cotton"], None, ProfileStatus::Active),
      listing("Akola", "Maharashtra", &["Cotton", "Soy"], None, ProfileStatus::Pending),
      listing("Satara", "Maharashtra", &["Wheat"], None, ProfileStatus::Active),
      listing("Bathinda", "Punjab", &["Wheat"], None, ProfileStatus::Active),
    ];

    let filters = aggregate(&farmers);
    assert_eq!(filters.districts, vec!["Akola", "Bathinda", "Satara"]);
    assert_eq!(filters.states, vec!["Maharashtra", "Punjab"]);
    assert_eq!(filters.crops, vec!["Cotton", "Soy", "Wheat"]);
  }

  #[test]
  fn blank_values_are_skipped_and_values_trimmed() {
    let mut blank = listing("  ", "", &["", " Maize "], None, ProfileStatus::Active);
    blank.farmer.state = None;
    let farmers = vec![blank, listing("Pune ", "Maharashtra", &["Maize"], None, ProfileStatus::Active)];

    let filters = aggregate(&farmers);
    assert_eq!(filters.districts, vec!["Pune"]);
    assert_eq!(filters.states, vec!["Maharashtra"]);
    assert_eq!(filters.crops, vec!["Maize"]);
  }

  #[test]
  fn no_listings_yields_empty_lists() {
    let none: Vec<FarmerListing> = Vec::new();
    assert_eq!(aggregate(&none), FarmerFilters::default());
  }

  // ── Properties ──────────────────────────────────────────────────────────────

  mod properties {
    use proptest::{prelude::*, test_runner::Config};

    use super::*;

    fn value() -> impl Strategy<Value = String> {
      prop::sample::select(vec![
        "", "  ", "Pune", " Pune", "Pune ", "Akola", "Wheat", "Rice", "Soy",
        "Maharashtra", "Punjab",
      ])
      .prop_map(str::to_owned)
    }

    fn any_listing() -> impl Strategy<Value = FarmerListing> {
      (
        prop::option::of(value()),
        prop::option::of(value()),
        prop::collection::vec(value(), 0..4),
        any::<bool>(),
        prop::sample::select(vec![
          ProfileStatus::Pending,
          ProfileStatus::Approved,
          ProfileStatus::Rejected,
          ProfileStatus::Suspended,
          ProfileStatus::Active,
        ]),
      )
        .prop_map(|(district, state, crops, assigned, status)| FarmerListing {
          farmer:         Farmer {
            id: Uuid::nil(),
            profile_id: Uuid::nil(),
            district,
            state,
            current_crops: crops,
            consultant_id: assigned.then(Uuid::nil),
          },
          profile_status: status,
        })
    }

    fn strictly_ascending(values: &[String]) -> bool {
      values.windows(2).all(|w| w[0] < w[1])
    }

    /// Every output value is the trimmed value of some open listing.
    fn drawn_from_open<'a>(
      values: &[String],
      listings: &'a [FarmerListing],
      field: impl Fn(&'a Farmer) -> Vec<&'a str>,
    ) -> bool {
      values.iter().all(|v| {
        !v.is_empty()
          && listings
            .iter()
            .filter(|l| l.is_open_for_assignment())
            .flat_map(|l| field(&l.farmer))
            .any(|raw| raw.trim() == v.as_str())
      })
    }

    proptest! {
      #![proptest_config(Config::with_cases(256))]
      #[test]
      fn lists_are_sorted_distinct_and_from_open_farmers(
        listings in prop::collection::vec(any_listing(), 0..12)
      ) {
        let filters = aggregate(&listings);

        prop_assert!(strictly_ascending(&filters.districts));
        prop_assert!(strictly_ascending(&filters.states));
        prop_assert!(strictly_ascending(&filters.crops));

        prop_assert!(drawn_from_open(&filters.districts, &listings, |f| {
          f.district.as_deref().into_iter().collect()
        }), "districts not drawn from open farmers");
        prop_assert!(drawn_from_open(&filters.states, &listings, |f| {
          f.state.as_deref().into_iter().collect()
        }), "states not drawn from open farmers");
        prop_assert!(drawn_from_open(&filters.crops, &listings, |f| {
          f.current_crops.iter().map(String::as_str).collect()
        }), "crops not drawn from open farmers");
      }
    }
  }
}
