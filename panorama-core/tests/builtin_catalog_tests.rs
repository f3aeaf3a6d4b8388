use anyhow::Result;
use panorama_core::domain::catalog::{find_by_title, resolve_eligible_metrics};
use panorama_core::domain::metric::MetricCategory;
use panorama_core::infrastructure::catalog::builtin_catalog;

#[test]
fn test_dart_titles() -> Result<()> {
    let catalog = builtin_catalog()?;
    let titles: Vec<String> = resolve_eligible_metrics(&catalog, ["dart"])
        .into_iter()
        .map(|o| o.title)
        .collect();

    insta::assert_snapshot!(titles.join("\n"), @r"
    Maintainability
    Security
    Readability
    Reusability
    Maintainability Index
    Cyclomatic Complexity
    Comment Density
    Number of Violations
    Number of Critical Violations
    Number of Major Violations
    Duplicated Lines
    Duplication Percentage
    Source Lines of Code
    Halstead Volume
    Number of Parameters
    Number of Functions
    ");
    Ok(())
}

#[test]
fn test_metric_scores_are_only_offered_once() -> Result<()> {
    let catalog = builtin_catalog()?;
    let options = resolve_eligible_metrics(&catalog, ["python", "javascript", "php"]);

    for id in ["MI", "CC", "CD", "ESCOMP_MI", "PHPMETRICS_MI"] {
        let carrying = options.iter().filter(|o| o.metric.contains(id)).count();
        assert!(carrying <= 1, "{id} offered {carrying} times");
    }
    let mi = find_by_title(&options, "Maintainability Index").unwrap();
    assert_eq!(mi.category, MetricCategory::MetricScores);
    assert_eq!(mi.metric.len(), 1);
    Ok(())
}

#[test]
fn test_javascript_and_php_share_size_option() -> Result<()> {
    let catalog = builtin_catalog()?;
    let options = resolve_eligible_metrics(&catalog, ["javascript", "php"]);
    let size = find_by_title(&options, "Size in Lines of Code").unwrap();
    assert!(size.metric.contains("ESCOMP_LOC"));
    assert!(size.metric.contains("PHPMETRICS_LOC"));
    assert!(size.integer_valued);
    assert!(find_by_title(&options, "Number of Files").is_some());
    Ok(())
}

#[test]
fn test_java_and_javascript_merge_size_titles() -> Result<()> {
    let catalog = builtin_catalog()?;
    let options = resolve_eligible_metrics(&catalog, ["java", "javascript"]);
    let merged = find_by_title(&options, "(Class) Size in Lines of Code").unwrap();
    assert!(merged.metric.contains("LOC"));
    assert!(merged.metric.contains("ESCOMP_LOC"));
    assert!(find_by_title(&options, "Size in Lines of Code").is_none());
    assert!(find_by_title(&options, "Class Size in Lines of Code").is_none());
    Ok(())
}

#[test]
fn test_characteristics_are_grade_scored() -> Result<()> {
    let catalog = builtin_catalog()?;
    let options = resolve_eligible_metrics(&catalog, ["go"]);
    let security = find_by_title(&options, "Security").unwrap();
    assert!(security.category.uses_grades());
    assert!(!security.integer_valued);
    Ok(())
}
