//! Vehicle finder: Year → Make → Model → Trim → Tire size.

use std::collections::HashSet;

use treadline_core::{Make, Model, ReferenceValue, TireSize, Trim, VehicleSelection, Year};

use crate::cascade::{Cascade, Transition};
use crate::error::FinderError;
use crate::options::{OptionSlot, OptionsState, Ticket};

const LABELS: &[&str] = &["year", "make", "model", "trim", "tire size"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleStage {
    Year = 1,
    Make = 2,
    Model = 3,
    Trim = 4,
    TireSize = 5,
}

impl VehicleStage {
    pub const ALL: [VehicleStage; 5] = [
        VehicleStage::Year,
        VehicleStage::Make,
        VehicleStage::Model,
        VehicleStage::Trim,
        VehicleStage::TireSize,
    ];

    #[must_use]
    pub fn number(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_number(stage: usize) -> Option<Self> {
        stage.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        LABELS[self.number() - 1]
    }
}

/// Cascading vehicle chooser over plain string values.
#[derive(Debug, Clone)]
pub struct VehicleFinder {
    cascade: Cascade<String>,
}

impl Default for VehicleFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleFinder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cascade: Cascade::new(LABELS),
        }
    }

    /// The stage the finder is showing. Stays on the tire size stage once complete.
    #[must_use]
    pub fn stage(&self) -> VehicleStage {
        VehicleStage::from_number(self.cascade.current_stage()).unwrap_or(VehicleStage::Year)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cascade.is_complete()
    }

    #[must_use]
    pub fn value(&self, stage: VehicleStage) -> Option<&str> {
        self.cascade.value(stage.number()).map(String::as_str)
    }

    #[must_use]
    pub fn is_reachable(&self, stage: VehicleStage) -> bool {
        self.cascade.is_reachable(stage.number())
    }

    /// # Errors
    ///
    /// [`FinderError::StageLocked`] when an earlier stage is empty.
    pub fn select(
        &mut self,
        stage: VehicleStage,
        value: impl Into<String>,
    ) -> Result<Transition, FinderError> {
        self.cascade.select(stage.number(), value.into())
    }

    /// Like [`VehicleFinder::select`], but only accepts a value present in
    /// `offered`, the option list currently shown for `stage`.
    ///
    /// # Errors
    ///
    /// [`FinderError::UnknownOption`] for a value not on offer, otherwise as
    /// [`VehicleFinder::select`].
    pub fn select_offered(
        &mut self,
        stage: VehicleStage,
        value: &str,
        offered: &[String],
    ) -> Result<Transition, FinderError> {
        if !offered.iter().any(|o| o == value) {
            return Err(FinderError::UnknownOption {
                stage_name: stage.label(),
                value: value.to_owned(),
            });
        }
        self.select(stage, value)
    }

    /// # Errors
    ///
    /// [`FinderError::StageLocked`] when an earlier stage is empty.
    pub fn go_to(&mut self, stage: VehicleStage) -> Result<(), FinderError> {
        self.cascade.go_to(stage.number())
    }

    pub fn reset(&mut self) {
        self.cascade.reset();
    }

    /// The choices so far. Empty strings stand in for unfilled stages.
    #[must_use]
    pub fn selection(&self) -> VehicleSelection {
        let field = |stage: VehicleStage| self.value(stage).unwrap_or_default().to_owned();
        VehicleSelection {
            year: field(VehicleStage::Year),
            make: field(VehicleStage::Make),
            model: field(VehicleStage::Model),
            trim: field(VehicleStage::Trim),
            tire_size: field(VehicleStage::TireSize),
        }
    }

    /// # Errors
    ///
    /// [`FinderError::Incomplete`] until a tire size has been chosen.
    pub fn proceed(&self) -> Result<VehicleSelection, FinderError> {
        self.cascade.proceed()?;
        Ok(self.selection())
    }

    /// Upstream values that scope the option list for `stage`, or `None` while
    /// the stage is locked.
    #[must_use]
    pub fn options_key(&self, stage: VehicleStage) -> Option<Vec<String>> {
        if !self.is_reachable(stage) {
            return None;
        }
        Some(
            VehicleStage::ALL[..stage.number() - 1]
                .iter()
                .filter_map(|s| self.value(*s).map(str::to_owned))
                .collect(),
        )
    }
}

fn linked(link: Option<&String>, chosen: &str) -> bool {
    link.is_none_or(|l| l == chosen)
}

fn distinct_values<'a, T: ReferenceValue + 'a>(records: impl Iterator<Item = &'a T>) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .map(ReferenceValue::value)
        .filter(|v| !v.trim().is_empty() && seen.insert(*v))
        .map(str::to_owned)
        .collect()
}

#[must_use]
pub fn year_options(years: &[Year]) -> Vec<String> {
    distinct_values(years.iter())
}

#[must_use]
pub fn make_options(makes: &[Make], year: &str) -> Vec<String> {
    distinct_values(makes.iter().filter(|m| linked(m.year.as_ref(), year)))
}

#[must_use]
pub fn model_options(models: &[Model], year: &str, make: &str) -> Vec<String> {
    distinct_values(
        models
            .iter()
            .filter(|m| linked(m.year.as_ref(), year) && linked(m.make.as_ref(), make)),
    )
}

#[must_use]
pub fn trim_options(trims: &[Trim], year: &str, make: &str, model: &str) -> Vec<String> {
    distinct_values(trims.iter().filter(|t| {
        linked(t.year.as_ref(), year)
            && linked(t.make.as_ref(), make)
            && linked(t.model.as_ref(), model)
    }))
}

#[must_use]
pub fn tire_size_options(
    sizes: &[TireSize],
    year: &str,
    make: &str,
    model: &str,
    trim: &str,
) -> Vec<String> {
    distinct_values(sizes.iter().filter(|s| {
        linked(s.year.as_ref(), year)
            && linked(s.make.as_ref(), make)
            && linked(s.model.as_ref(), model)
            && linked(s.trim.as_ref(), trim)
    }))
}

/// One option slot per vehicle stage, kept in step with a [`VehicleFinder`].
#[derive(Debug, Clone, Default)]
pub struct VehicleOptions {
    slots: [OptionSlot<Vec<String>, String>; 5],
}

impl VehicleOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, stage: VehicleStage) -> &OptionsState<String> {
        self.slots[stage.number() - 1].state()
    }

    /// Re-keys every slot against the finder's current choices.
    ///
    /// Locked stages are locked here. A stage whose upstream choices changed,
    /// or whose last load failed, gets a fresh request; its ticket is returned
    /// so the caller can fetch and then [`VehicleOptions::complete`] it.
    pub fn sync_with(&mut self, finder: &VehicleFinder) -> Vec<(VehicleStage, Ticket<Vec<String>>)> {
        let mut tickets = Vec::new();
        for stage in VehicleStage::ALL {
            let slot = &mut self.slots[stage.number() - 1];
            match finder.options_key(stage) {
                None => {
                    if slot.key().is_some() || !matches!(slot.state(), OptionsState::Locked) {
                        slot.lock();
                    }
                }
                Some(key) => {
                    let stale = slot.key() != Some(&key)
                        || matches!(slot.state(), OptionsState::Failed(_) | OptionsState::Locked);
                    if stale {
                        tickets.push((stage, slot.request(key)));
                    }
                }
            }
        }
        tickets
    }

    /// Applies a fetched option list. Stale tickets are discarded.
    pub fn complete(
        &mut self,
        stage: VehicleStage,
        ticket: &Ticket<Vec<String>>,
        result: Result<Vec<String>, String>,
    ) -> bool {
        self.slots[stage.number() - 1].complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treadline_core::RefId;

    fn civic_finder() -> VehicleFinder {
        let mut finder = VehicleFinder::new();
        finder.select(VehicleStage::Year, "2020").unwrap();
        finder.select(VehicleStage::Make, "Honda").unwrap();
        finder.select(VehicleStage::Model, "Civic").unwrap();
        finder.select(VehicleStage::Trim, "EX").unwrap();
        finder
    }

    fn make(name: &str, year: Option<&str>) -> Make {
        Make {
            id: RefId::new(format!("{name}-{}", year.unwrap_or("any"))),
            make: name.to_owned(),
            year: year.map(str::to_owned),
        }
    }

    #[test]
    fn stage_numbers_round_trip() {
        for stage in VehicleStage::ALL {
            assert_eq!(VehicleStage::from_number(stage.number()), Some(stage));
        }
        assert_eq!(VehicleStage::from_number(0), None);
        assert_eq!(VehicleStage::from_number(6), None);
    }

    #[test]
    fn full_walk_yields_selection() {
        let mut finder = civic_finder();
        assert_eq!(finder.stage(), VehicleStage::TireSize);
        assert_eq!(
            finder.select(VehicleStage::TireSize, "215/55R16"),
            Ok(Transition::Completed)
        );
        let vehicle = finder.proceed().unwrap();
        assert_eq!(vehicle.describe(), "2020 Honda Civic EX (215/55R16)");
    }

    #[test]
    fn cannot_pick_model_before_make() {
        let mut finder = VehicleFinder::new();
        finder.select(VehicleStage::Year, "2020").unwrap();
        let err = finder.select(VehicleStage::Model, "Civic").unwrap_err();
        assert_eq!(err.to_string(), "cannot choose model before choosing make");
        assert_eq!(finder.value(VehicleStage::Model), None);
        assert_eq!(finder.stage(), VehicleStage::Make);
    }

    #[test]
    fn blank_year_cannot_open_later_stages() {
        let mut finder = VehicleFinder::new();
        assert_eq!(
            finder.select(VehicleStage::Year, ""),
            Err(FinderError::EmptyValue { stage_name: "year" })
        );
        assert!(matches!(
            finder.select(VehicleStage::Make, "Honda"),
            Err(FinderError::StageLocked { missing: "year", .. })
        ));
        assert_eq!(finder.stage(), VehicleStage::Year);
        assert!(finder.proceed().is_err());
    }

    #[test]
    fn changing_year_clears_everything_after_it() {
        let mut finder = civic_finder();
        finder.select(VehicleStage::Year, "2021").unwrap();
        let partial = finder.selection();
        assert_eq!(partial.year, "2021");
        assert!(partial.make.is_empty());
        assert!(partial.trim.is_empty());
        assert_eq!(finder.stage(), VehicleStage::Make);
    }

    #[test]
    fn proceed_names_missing_stage() {
        let finder = civic_finder();
        assert_eq!(
            finder.proceed(),
            Err(FinderError::Incomplete { missing: "tire size" })
        );
    }

    #[test]
    fn select_offered_rejects_values_not_in_list() {
        let mut finder = VehicleFinder::new();
        let offered = vec!["2020".to_owned(), "2021".to_owned()];
        let err = finder
            .select_offered(VehicleStage::Year, "1999", &offered)
            .unwrap_err();
        assert!(matches!(err, FinderError::UnknownOption { stage_name: "year", .. }));
        assert!(finder.value(VehicleStage::Year).is_none());
        finder
            .select_offered(VehicleStage::Year, "2021", &offered)
            .unwrap();
    }

    #[test]
    fn makes_filter_by_year_and_keep_unlinked_records() {
        let makes = vec![
            make("Honda", Some("2020")),
            make("Toyota", Some("2021")),
            make("Ford", None),
            make("Honda", Some("2020")),
        ];
        assert_eq!(make_options(&makes, "2020"), vec!["Honda", "Ford"]);
        assert_eq!(make_options(&makes, "2021"), vec!["Toyota", "Ford"]);
    }

    #[test]
    fn tire_sizes_filter_by_every_upstream_value() {
        let size = |value: &str, trim: Option<&str>| TireSize {
            id: RefId::new(value),
            tire_size: value.to_owned(),
            trim: trim.map(str::to_owned),
            model: Some("Civic".to_owned()),
            make: Some("Honda".to_owned()),
            year: Some("2020".to_owned()),
        };
        let sizes = vec![size("215/55R16", Some("EX")), size("235/40R18", Some("Si"))];
        assert_eq!(
            tire_size_options(&sizes, "2020", "Honda", "Civic", "EX"),
            vec!["215/55R16"]
        );
        assert!(tire_size_options(&sizes, "2019", "Honda", "Civic", "EX").is_empty());
    }

    #[test]
    fn options_key_is_none_while_locked() {
        let finder = VehicleFinder::new();
        assert_eq!(finder.options_key(VehicleStage::Year), Some(vec![]));
        assert_eq!(finder.options_key(VehicleStage::Make), None);
        let finder = civic_finder();
        assert_eq!(
            finder.options_key(VehicleStage::TireSize),
            Some(vec![
                "2020".to_owned(),
                "Honda".to_owned(),
                "Civic".to_owned(),
                "EX".to_owned()
            ])
        );
    }

    #[test]
    fn sync_requests_reachable_stages_once() {
        let mut finder = VehicleFinder::new();
        let mut options = VehicleOptions::new();

        let tickets = options.sync_with(&finder);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].0, VehicleStage::Year);
        assert!(options.state(VehicleStage::Year).is_loading());
        assert_eq!(options.state(VehicleStage::Make), &OptionsState::Locked);

        assert!(options.sync_with(&finder).is_empty(), "no change, no request");

        finder.select(VehicleStage::Year, "2020").unwrap();
        let tickets = options.sync_with(&finder);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].0, VehicleStage::Make);
    }

    #[test]
    fn makes_for_old_year_are_discarded_after_year_changes() {
        let mut finder = VehicleFinder::new();
        let mut options = VehicleOptions::new();
        finder.select(VehicleStage::Year, "2019").unwrap();
        let (_, old) = options
            .sync_with(&finder)
            .into_iter()
            .find(|(s, _)| *s == VehicleStage::Make)
            .unwrap();

        finder.select(VehicleStage::Year, "2020").unwrap();
        let (_, new) = options
            .sync_with(&finder)
            .into_iter()
            .find(|(s, _)| *s == VehicleStage::Make)
            .unwrap();

        assert!(options.complete(VehicleStage::Make, &new, Ok(vec!["Honda".to_owned()])));
        assert!(!options.complete(VehicleStage::Make, &old, Ok(vec!["Saab".to_owned()])));
        assert_eq!(options.state(VehicleStage::Make).items(), ["Honda".to_owned()]);
    }

    #[test]
    fn failed_stage_is_retried_and_upstream_kept() {
        let mut finder = VehicleFinder::new();
        let mut options = VehicleOptions::new();
        finder.select(VehicleStage::Year, "2020").unwrap();
        for (stage, ticket) in options.sync_with(&finder) {
            options.complete(stage, &ticket, Err("backend down".to_owned()));
        }
        assert!(matches!(
            options.state(VehicleStage::Make),
            OptionsState::Failed(_)
        ));
        assert_eq!(finder.value(VehicleStage::Year), Some("2020"));

        let retry = options.sync_with(&finder);
        assert!(retry.iter().any(|(s, _)| *s == VehicleStage::Make));
    }

    #[test]
    fn going_back_locks_downstream_slots() {
        let mut finder = civic_finder();
        let mut options = VehicleOptions::new();
        options.sync_with(&finder);
        assert!(options.state(VehicleStage::TireSize).is_loading());

        finder.select(VehicleStage::Make, "Toyota").unwrap();
        options.sync_with(&finder);
        assert_eq!(options.state(VehicleStage::TireSize), &OptionsState::Locked);
        assert!(options.state(VehicleStage::Model).is_loading());
    }
}
