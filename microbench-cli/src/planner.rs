//! Benchmark Planner
//!
//! Builds the execution plan by filtering the registry.
//!
//! The filter is a plain substring matched against `suite.name`. Ordering is
//! never changed: cases run and are reported in registration order.

use microbench_core::{BenchmarkCase, Registry};

/// Execution plan for benchmarks
pub struct ExecutionPlan {
    /// Cases to run, in registration order
    pub cases: Vec<BenchmarkCase>,
    /// Registered cases the filter excluded
    pub filtered_out: usize,
}

/// Whether `case` is selected by `filter` (no filter selects everything)
pub fn matches(case: &BenchmarkCase, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(pattern) => case.id().contains(pattern),
    }
}

/// Borrowing view of the selected cases, used for listing
pub fn select<'a>(cases: &'a [BenchmarkCase], filter: Option<&str>) -> Vec<&'a BenchmarkCase> {
    cases.iter().filter(|c| matches(c, filter)).collect()
}

/// Consume the registry and keep the cases selected by `filter`
pub fn build_plan(registry: Registry, filter: Option<&str>) -> ExecutionPlan {
    let total = registry.len();
    let cases: Vec<_> = registry
        .into_cases()
        .into_iter()
        .filter(|c| matches(c, filter))
        .collect();

    ExecutionPlan {
        filtered_out: total - cases.len(),
        cases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::from_cases([
            BenchmarkCase::new("cpp11", "tenth_of_a_second", || ()),
            BenchmarkCase::new("cpp11", "do_nothing", || ()),
            BenchmarkCase::new("cpp11_my_fixture", "strchr", || ()),
            BenchmarkCase::new("cpp11_my_fixture", "strrchr", || ()),
        ])
        .unwrap()
    }

    fn ids(plan: &ExecutionPlan) -> Vec<String> {
        plan.cases.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_no_filter_keeps_registration_order() {
        let plan = build_plan(registry(), None);

        assert_eq!(
            ids(&plan),
            vec![
                "cpp11.tenth_of_a_second",
                "cpp11.do_nothing",
                "cpp11_my_fixture.strchr",
                "cpp11_my_fixture.strrchr",
            ]
        );
        assert_eq!(plan.filtered_out, 0);
    }

    #[test]
    fn test_substring_filter() {
        let plan = build_plan(registry(), Some("strchr"));
        assert_eq!(ids(&plan), vec!["cpp11_my_fixture.strchr"]);
        assert_eq!(plan.filtered_out, 3);
    }

    #[test]
    fn test_filter_matches_across_the_dot() {
        let plan = build_plan(registry(), Some("cpp11.do"));
        assert_eq!(ids(&plan), vec!["cpp11.do_nothing"]);
    }

    #[test]
    fn test_empty_filter_selects_everything() {
        let registry = registry();
        assert_eq!(select(registry.all(), Some("")).len(), 4);
        assert!(select(registry.all(), Some("nonexistent")).is_empty());
    }
}
