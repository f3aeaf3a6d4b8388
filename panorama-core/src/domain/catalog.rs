// panorama-core/src/domain/catalog.rs

use crate::domain::metric::{MetricCategory, MetricSet};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use validator::{Validate, ValidationError};

// --- FIXED LOOKUP TABLES ---

const CLASS_SIZE_TITLE: &str = "Class Size in Lines of Code";
const SIZE_TITLE: &str = "Size in Lines of Code";
const MERGED_SIZE_TITLE: &str = "(Class) Size in Lines of Code";

/// Raw identifiers that all mean "lines of code", whatever the analyzer.
pub const LINES_OF_CODE_IDS: [&str; 3] = ["LOC", "PHPMETRICS_LOC", "ESCOMP_LOC"];

/// Languages whose analyzers measure lines of code per class rather than per file.
const CLASS_SIZE_LANGUAGES: [&str; 3] = ["python", "java", "c#"];

struct SyntheticOption {
    title: &'static str,
    metric_id: &'static str,
    category: MetricCategory,
    languages: &'static [&'static str],
}

const SYNTHETIC_OPTIONS: [SyntheticOption; 4] = [
    SyntheticOption {
        title: "Number of Files",
        metric_id: "NUMBER_OF_FILES",
        category: MetricCategory::Size,
        languages: &["javascript", "typescript"],
    },
    SyntheticOption {
        title: "Number of Classes",
        metric_id: "NUMBER_OF_CLASSES",
        category: MetricCategory::Size,
        languages: &["python", "java", "php", "kotlin", "c#"],
    },
    SyntheticOption {
        title: "Number of Methods",
        metric_id: "NUMBER_OF_METHODS",
        category: MetricCategory::Size,
        languages: &["java", "kotlin", "c#", "php"],
    },
    SyntheticOption {
        title: "Number of Functions",
        metric_id: "NUMBER_OF_FUNCTIONS",
        category: MetricCategory::Size,
        languages: &["python", "javascript", "typescript", "dart", "go"],
    },
];

const INTEGER_TITLES: [&str; 18] = [
    MERGED_SIZE_TITLE,
    CLASS_SIZE_TITLE,
    SIZE_TITLE,
    "Source Lines of Code",
    "Number of Files",
    "Number of Classes",
    "Number of Methods",
    "Number of Functions",
    "Number of Parameters",
    "Number of Children",
    "Depth of Inheritance Tree",
    "Coupling Between Objects",
    "Response for a Class",
    "Number of Violations",
    "Number of Critical Violations",
    "Number of Major Violations",
    "Duplicated Lines",
    "Complex Methods",
];

// --- CATALOG (injected table) ---

/// One raw analyzer metric as published by the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CatalogEntry {
    #[validate(length(min = 1, message = "Metric identifier cannot be empty"))]
    pub metric_id: String,
    pub category: MetricCategory,
    #[validate(length(min = 1, message = "Metric title cannot be empty"))]
    pub title: String,
}

/// Static metric table: language-independent entries, per-language entries and
/// the identifiers that must never be offered directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MetricCatalog {
    #[validate(nested)]
    #[serde(default)]
    pub general: Vec<CatalogEntry>,

    #[validate(custom(function = "validate_language_tables"))]
    #[serde(default)]
    pub languages: BTreeMap<String, Vec<CatalogEntry>>,

    #[serde(default)]
    pub excluded: BTreeSet<String>,
}

fn validate_language_tables(
    tables: &BTreeMap<String, Vec<CatalogEntry>>,
) -> Result<(), ValidationError> {
    for (language, entries) in tables {
        if entries.iter().any(|e| e.validate().is_err()) {
            let mut err = ValidationError::new("invalid_language_table");
            err.message = Some(Cow::Owned(format!(
                "Language table '{}' contains an entry with an empty identifier or title",
                language
            )));
            return Err(err);
        }
    }
    Ok(())
}

/// A selectable gate metric: one display title over every raw identifier it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricOption {
    pub title: String,
    pub category: MetricCategory,
    pub metric: MetricSet,
    pub integer_valued: bool,
}

impl MetricCatalog {
    pub fn is_excluded(&self, metric_id: &str) -> bool {
        self.excluded.contains(metric_id)
    }

    pub fn table(&self, language: &str) -> &[CatalogEntry] {
        self.languages
            .get(&normalize_language(language))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Display title for a metric set evaluated on a repository of `language`.
    pub fn title_for(&self, metric: &MetricSet, language: &str) -> String {
        if LINES_OF_CODE_IDS.iter().any(|id| metric.contains(id)) {
            let language = normalize_language(language);
            return if CLASS_SIZE_LANGUAGES.contains(&language.as_str()) {
                "Class Size In Lines of Code".to_string()
            } else {
                SIZE_TITLE.to_string()
            };
        }

        resolve_eligible_metrics(self, [language])
            .into_iter()
            .find(|option| option.metric.intersects(metric))
            .map(|option| option.title)
            .unwrap_or_else(|| metric.to_string())
    }
}

pub fn normalize_language(language: &str) -> String {
    let lowered = language.trim().to_lowercase();
    match lowered.as_str() {
        "csharp" | "c sharp" => "c#".to_string(),
        "js" => "javascript".to_string(),
        "ts" => "typescript".to_string(),
        _ => lowered,
    }
}

/// Eligible gate metrics for a project whose repositories use `languages`.
///
/// General options come first, then per-language options in first-seen order
/// (languages visited alphabetically), then the synthetic counters. Options
/// sharing a title are merged into one option over the union of identifiers.
pub fn resolve_eligible_metrics<I, S>(catalog: &MetricCatalog, languages: I) -> Vec<MetricOption>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let languages: BTreeSet<String> = languages
        .into_iter()
        .map(|l| normalize_language(l.as_ref()))
        .filter(|l| !l.is_empty())
        .collect();

    let mut options: Vec<MetricOption> = Vec::new();

    for entry in &catalog.general {
        merge_entry(&mut options, &entry.title, entry.category, &entry.metric_id);
    }

    for language in &languages {
        for entry in catalog.table(language) {
            if catalog.is_excluded(&entry.metric_id) {
                continue;
            }
            merge_entry(&mut options, &entry.title, entry.category, &entry.metric_id);
        }
    }

    merge_lines_of_code(&mut options);

    for synthetic in &SYNTHETIC_OPTIONS {
        let applies = synthetic
            .languages
            .iter()
            .any(|l| languages.contains(*l));
        if applies {
            merge_entry(
                &mut options,
                synthetic.title,
                synthetic.category,
                synthetic.metric_id,
            );
        }
    }

    for option in &mut options {
        option.integer_valued = INTEGER_TITLES.contains(&option.title.as_str());
    }

    options
}

fn merge_entry(
    options: &mut Vec<MetricOption>,
    title: &str,
    category: MetricCategory,
    metric_id: &str,
) {
    match options.iter_mut().find(|o| o.title == title) {
        Some(existing) => existing.metric.insert(metric_id),
        None => options.push(MetricOption {
            title: title.to_string(),
            category,
            metric: MetricSet::single(metric_id),
            integer_valued: false,
        }),
    }
}

// "Class Size in Lines of Code" and "Size in Lines of Code" are one condition
// as soon as both kinds of analyzers are present.
fn merge_lines_of_code(options: &mut Vec<MetricOption>) {
    let class_idx = options.iter().position(|o| o.title == CLASS_SIZE_TITLE);
    let size_idx = options.iter().position(|o| o.title == SIZE_TITLE);

    if let (Some(class_idx), Some(size_idx)) = (class_idx, size_idx) {
        let (keep, drop) = if class_idx < size_idx {
            (class_idx, size_idx)
        } else {
            (size_idx, class_idx)
        };
        let removed = options.remove(drop);
        let kept = &mut options[keep];
        kept.metric = kept.metric.union(&removed.metric);
        kept.title = MERGED_SIZE_TITLE.to_string();
    }
}

pub fn find_by_title<'a>(options: &'a [MetricOption], title: &str) -> Option<&'a MetricOption> {
    options.iter().find(|o| o.title == title)
}

pub fn find_by_metric<'a>(options: &'a [MetricOption], metric: &MetricSet) -> Option<&'a MetricOption> {
    options.iter().find(|o| &o.metric == metric)
}

/// Option carrying `previous`'s title in a newer catalog. The lines-of-code
/// titles are renamed when they merge or split, so a size option is followed
/// under another size title as long as the two still share an identifier.
pub fn find_successor<'a>(
    options: &'a [MetricOption],
    previous: &MetricOption,
) -> Option<&'a MetricOption> {
    find_by_title(options, &previous.title).or_else(|| {
        let size_titles = [CLASS_SIZE_TITLE, SIZE_TITLE, MERGED_SIZE_TITLE];
        if !size_titles.contains(&previous.title.as_str()) {
            return None;
        }
        options.iter().find(|o| {
            size_titles.contains(&o.title.as_str()) && o.metric.intersects(&previous.metric)
        })
    })
}
