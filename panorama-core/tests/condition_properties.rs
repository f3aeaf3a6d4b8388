use panorama_core::domain::catalog::resolve_eligible_metrics;
use panorama_core::domain::condition::{
    Condition, Operator, Threshold, is_valid_condition, reconcile_conditions_on_catalog_change,
};
use panorama_core::domain::gate::{BranchToken, DraftContext, GateScope, init_draft};
use panorama_core::domain::grade::Grade;
use panorama_core::domain::metric::MetricSet;
use panorama_core::domain::GateDiff;
use panorama_core::infrastructure::catalog::builtin_catalog;
use proptest::prelude::*;

const LANGUAGES: [&str; 9] = [
    "python",
    "java",
    "c#",
    "kotlin",
    "php",
    "javascript",
    "typescript",
    "dart",
    "go",
];

fn languages() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(LANGUAGES.to_vec(), 0..=4)
}

proptest! {
    #[test]
    fn non_negative_numbers_are_valid_except_less_than_zero(
        op in prop::sample::select(Operator::ALL.to_vec()),
        n in 0.0f64..1_000_000.0,
    ) {
        let condition = Condition::new(MetricSet::single("LOC"), op, Threshold::Number(n));
        let expected = !(op == Operator::Lt && n == 0.0);
        prop_assert_eq!(is_valid_condition(&condition), expected);
    }

    #[test]
    fn negative_numbers_are_never_valid(
        op in prop::sample::select(Operator::ALL.to_vec()),
        n in -1_000_000.0f64..-0.0001,
    ) {
        let condition = Condition::new(MetricSet::single("LOC"), op, Threshold::Number(n));
        prop_assert!(!is_valid_condition(&condition));
    }

    #[test]
    fn grades_are_valid_except_past_the_scale_edges(
        op in prop::sample::select(Operator::ALL.to_vec()),
        grade in prop::sample::select(Grade::ALL.to_vec()),
    ) {
        let condition = Condition::new(
            MetricSet::single("MAINTAINABILITY"),
            op,
            Threshold::Grade(grade),
        );
        let expected = !((op == Operator::Lt && grade == Grade::DMinus)
            || (op == Operator::Gt && grade == Grade::APlus));
        prop_assert_eq!(is_valid_condition(&condition), expected);
    }

    #[test]
    fn reconcile_is_idempotent(from in languages(), to in languages()) {
        let catalog = builtin_catalog().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let before = resolve_eligible_metrics(&catalog, &from);
        let after = resolve_eligible_metrics(&catalog, &to);
        let conditions: Vec<Condition> = before
            .iter()
            .map(|o| Condition::new(o.metric.clone(), Operator::Le, Threshold::Number(1.0)))
            .collect();

        let once = reconcile_conditions_on_catalog_change(&conditions, &before, &after);
        let twice = reconcile_conditions_on_catalog_change(&once, &after, &after);
        prop_assert_eq!(&once, &twice);

        for condition in &once {
            prop_assert!(after.iter().any(|o| o.metric == condition.metric));
        }
    }

    #[test]
    fn branch_order_never_counts_as_a_change(
        picked in prop::sample::subsequence(
            vec![BranchToken::Production, BranchToken::Staging],
            1..=2,
        ).prop_shuffle(),
    ) {
        let ctx = DraftContext::Organization { template_requested: false };
        let mut baseline = init_draft(None, &ctx);
        let mut sorted = picked.clone();
        sorted.sort();
        baseline.scope = GateScope::Organization { branches: sorted };

        let mut draft = baseline.clone();
        draft.scope = GateScope::Organization { branches: picked };

        prop_assert!(GateDiff::between(&draft, &baseline).is_unchanged());
    }
}
