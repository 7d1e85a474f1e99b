//! Property tests for selection and wizard accounting.

use keel_prospect::{
    reduce, CompanyFilters, CompanyResult, NormalizedResult, Pagination, ResultId,
    SearchFilterSet, SearchPage, SelectionSet, WizardEvent, WizardLimits, WizardQuery,
    WizardState,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn company(n: u16) -> NormalizedResult {
    NormalizedResult::Company(CompanyResult {
        ai_ark_id: ResultId::from(format!("r{n}").as_str()),
        name: format!("Row {n}"),
        domain: None,
        website: None,
        industry: None,
        location: None,
        employee_count: None,
        linkedin_url: None,
    })
}

fn page(ids: &[u16], credits: f64) -> SearchPage {
    SearchPage {
        results: ids.iter().copied().map(company).collect(),
        pagination: Pagination {
            total: 10_000,
            ..Pagination::default()
        },
        credits_consumed: credits,
    }
}

fn started() -> WizardState {
    let query = WizardQuery::Filters(SearchFilterSet::Company(CompanyFilters {
        industries: vec!["SaaS".to_string()],
        ..CompanyFilters::default()
    }));
    WizardState::new(query, WizardLimits::default())
}

proptest! {
    #[test]
    fn proptest_toggle_twice_is_identity(
        initial in prop::collection::vec(0u16..50, 0..20),
        target in 0u16..50,
    ) {
        let mut selection = SelectionSet::new();
        for id in &initial {
            selection.select(&ResultId::from(format!("r{id}").as_str()));
        }
        let before = selection.clone();
        let id = ResultId::from(format!("r{target}").as_str());
        selection.toggle(&id);
        selection.toggle(&id);
        prop_assert_eq!(selection, before);
    }

    #[test]
    fn proptest_select_all_then_deselect_all_is_empty(ids in prop::collection::vec(0u16..500, 0..40)) {
        let rows: Vec<NormalizedResult> = ids.iter().copied().map(company).collect();
        let mut selection = SelectionSet::new();
        selection.select_all(&rows);
        let once = selection.clone();
        selection.select_all(&rows);
        prop_assert_eq!(&selection, &once);
        selection.deselect_all();
        prop_assert!(selection.is_empty());
    }

    #[test]
    fn proptest_credits_never_decrease(
        preview_credits in -5.0f64..5.0,
        pages in prop::collection::vec(
            (prop::collection::vec(0u16..200, 0..30), -5.0f64..5.0),
            1..6,
        ),
    ) {
        let mut state = reduce(started(), WizardEvent::PreviewLoaded(page(&[1, 2], preview_credits))).unwrap();
        let mut last = state.credits.total();
        prop_assert!(last >= 0.0);

        let mut pages = pages.into_iter();
        let (first_ids, first_credits) = pages.next().unwrap();
        state = reduce(state, WizardEvent::FullLoaded(page(&first_ids, first_credits))).unwrap();
        prop_assert!(state.credits.total() >= last);
        last = state.credits.total();

        for (ids, credits) in pages {
            state = reduce(state, WizardEvent::MoreLoaded(page(&ids, credits))).unwrap();
            prop_assert!(state.credits.total() >= last);
            last = state.credits.total();
        }

        let state = reduce(state, WizardEvent::Reset).unwrap();
        prop_assert_eq!(state.credits.total(), 0.0);
    }

    #[test]
    fn proptest_full_results_are_unique_and_bounded(
        pages in prop::collection::vec(prop::collection::vec(0u16..120, 0..40), 1..6),
    ) {
        let limits = WizardLimits::default();
        let mut state = reduce(started(), WizardEvent::PreviewLoaded(page(&[0], 0.5))).unwrap();
        prop_assert!(state.preview.len() <= limits.preview_page_size as usize);

        let mut pages = pages.into_iter();
        let first = pages.next().unwrap();
        state = reduce(state, WizardEvent::FullLoaded(page(&first, 0.5))).unwrap();
        let mut more_calls = 0usize;
        for ids in pages {
            state = reduce(state, WizardEvent::MoreLoaded(page(&ids, 0.5))).unwrap();
            more_calls += 1;
        }

        let unique: HashSet<&ResultId> = state.full.iter().map(NormalizedResult::id).collect();
        prop_assert_eq!(unique.len(), state.full.len());
        prop_assert!(state.full.len() <= limits.full_page_size as usize * (1 + more_calls));
    }
}
