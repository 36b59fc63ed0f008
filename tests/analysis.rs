mod common;

use catalog_eda::analysis::{run_pipeline, AnalysisError, CatalogAnalyzer, CORRELATION_COLUMNS};
use catalog_eda::charts::{ChartData, ChartKind};
use catalog_eda::config::AnalysisConfig;
use catalog_eda::data::table::{CAST_COUNT, TITLE};
use catalog_eda::data::{self, DataCleaner};
use common::{
    cleaned_rows, cleaned_sample, fixture_path, CatalogRow, FailingRenderer, RecordingRenderer,
    TestWorkspace, SAMPLE_FILE,
};

fn analyzer() -> CatalogAnalyzer {
    CatalogAnalyzer::new(&AnalysisConfig::default())
}

fn value_pairs(counts: &[catalog_eda::analysis::report::ValueCount]) -> Vec<(&str, usize)> {
    counts.iter().map(|c| c.as_pair()).collect()
}

#[test]
fn country_with_most_content() {
    let table = cleaned_rows(&[
        CatalogRow {
            country: "US",
            ..CatalogRow::default()
        },
        CatalogRow {
            country: "US",
            ..CatalogRow::default()
        },
        CatalogRow {
            country: "FR",
            ..CatalogRow::default()
        },
        CatalogRow {
            country: "US",
            ..CatalogRow::default()
        },
        CatalogRow {
            country: "",
            ..CatalogRow::default()
        },
    ]);

    let content = analyzer().content_by_country(&table).unwrap();
    assert_eq!(content.most.country, "US");
    assert_eq!(content.most.count, 3);
    assert_eq!(
        value_pairs(&content.top),
        vec![("US", 3), ("FR", 1), ("notspecified", 1)]
    );
}

#[test]
fn country_ties_keep_first_seen_order() {
    let table = cleaned_rows(&[
        CatalogRow {
            country: "Canada",
            ..CatalogRow::default()
        },
        CatalogRow {
            country: "Brazil",
            ..CatalogRow::default()
        },
    ]);

    let content = analyzer().content_by_country(&table).unwrap();
    assert_eq!(content.most.country, "Canada");
}

#[test]
fn genres_are_split_and_counted() {
    let table = cleaned_rows(&[
        CatalogRow {
            listed_in: "Drama, Comedy",
            ..CatalogRow::default()
        },
        CatalogRow {
            listed_in: "Drama",
            ..CatalogRow::default()
        },
    ]);

    let genres = analyzer().top_genres(&table).unwrap();
    assert_eq!(value_pairs(&genres), vec![("Drama", 2), ("Comedy", 1)]);
}

#[test]
fn cast_count_counts_list_entries() {
    let mut table = cleaned_rows(&[
        CatalogRow {
            title: "Trio",
            cast: "a,b,c",
            ..CatalogRow::default()
        },
        CatalogRow {
            title: "Nobody",
            cast: "",
            ..CatalogRow::default()
        },
    ]);

    let extremes = analyzer().cast_extremes(&mut table).unwrap();
    assert_eq!(table.int_values(CAST_COUNT).unwrap(), vec![Some(3), Some(1)]);
    assert_eq!(extremes.max.title, "Trio");
    assert_eq!(extremes.max.count, 3);
}

#[test]
fn missing_title_is_reported_not_blanked() {
    let mut table = cleaned_rows(&[
        CatalogRow {
            title: "Named",
            ..CatalogRow::default()
        },
        CatalogRow {
            title: "",
            ..CatalogRow::default()
        },
    ]);

    let err = analyzer().cast_extremes(&mut table).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::MissingValue { column: TITLE, row: 1 }
    ));
}

#[test]
fn sample_catalog_answers() {
    let mut table = cleaned_sample();
    let report = analyzer().analyze(&mut table).expect("analyze sample");

    assert_eq!(report.rows, 8);
    assert_eq!(
        value_pairs(&report.type_distribution),
        vec![("Movie", 5), ("TV Show", 3)]
    );
    assert_eq!(
        value_pairs(&report.category_counts.rating_counts),
        vec![("PG", 3), ("TV-PG", 2), ("TV-G", 1), ("TV-14", 1), ("G", 1)]
    );
    assert_eq!(report.category_counts.release_year.count, 8);
    assert_eq!(report.category_counts.release_year.min, 1988.0);
    assert_eq!(report.category_counts.release_year.max, 2021.0);

    assert_eq!(report.content_by_country.most.country, "United States");
    assert_eq!(report.content_by_country.most.count, 5);
    assert_eq!(
        value_pairs(&report.content_by_country.top),
        vec![("United States", 5), ("notspecified", 2), ("France", 1)]
    );

    let directors: Vec<(&str, usize)> = report
        .top_directors
        .iter()
        .map(|d| (d.director.as_str(), d.count))
        .collect();
    assert_eq!(
        directors,
        vec![
            ("unknown", 3),
            ("Alonso Ramirez Ramos", 1),
            ("John Cherry", 1),
            ("Chris Columbus", 1),
            ("Pete Docter", 1),
            ("Brad Bird", 1),
        ]
    );

    assert_eq!(
        value_pairs(&report.top_genres),
        vec![
            ("Family", 4),
            ("Comedy", 4),
            ("Animation", 3),
            ("Docuseries", 2),
            ("Action-Adventure", 2),
            ("Historical", 1),
            ("Music", 1),
            ("Science Fiction", 1),
        ]
    );

    let per_year: Vec<(i64, usize)> = report
        .titles_per_year
        .iter()
        .map(|y| (y.year, y.count))
        .collect();
    assert_eq!(per_year, vec![(2019, 3), (2021, 5)]);

    assert_eq!(report.cast_extremes.max.title, "Ratatouille");
    assert_eq!(report.cast_extremes.max.count, 5);
    let cast: Vec<usize> = report.cast_extremes.top.iter().map(|t| t.count).collect();
    assert_eq!(cast, vec![5, 4, 3, 2, 2, 2, 1, 1]);
    assert_eq!(report.cast_extremes.top[3].title, "Ernest Saves Christmas");
}

#[test]
fn release_year_pivot_covers_every_row() {
    let table = cleaned_sample();
    let pivot = analyzer().titles_by_release_year(&table).unwrap();

    assert_eq!(pivot.total(), table.height());
    assert_eq!(pivot.rows, vec![1988, 1990, 2007, 2009, 2016, 2019, 2021]);
    assert_eq!(pivot.columns, vec!["Movie".to_string(), "TV Show".to_string()]);
    assert_eq!(pivot.cells[6], vec![0, 2]);
    assert_eq!(pivot.column_counts(0), vec![1, 1, 1, 1, 1, 0, 0]);
}

#[test]
fn correlation_is_symmetric_with_unit_diagonal() {
    let table = cleaned_sample();
    let matrix = analyzer().correlation(&table).unwrap();

    assert_eq!(matrix.labels, CORRELATION_COLUMNS.map(str::to_string).to_vec());
    assert!(matrix.is_symmetric());
    for name in CORRELATION_COLUMNS {
        let diagonal = matrix.get(name, name).unwrap();
        assert!((diagonal - 1.0).abs() < 1e-9, "{name}: {diagonal}");
    }
    for row in &matrix.values {
        for value in row {
            assert!(value.is_nan() || (-1.0..=1.0).contains(value));
        }
    }
}

#[test]
fn top_n_limits_rankings() {
    let config = AnalysisConfig {
        top_n: 2,
        ..AnalysisConfig::default()
    };
    let mut table = cleaned_sample();
    let report = CatalogAnalyzer::new(&config).analyze(&mut table).unwrap();

    assert_eq!(report.top_genres.len(), 2);
    assert_eq!(report.top_directors.len(), 2);
    assert_eq!(report.cast_extremes.top.len(), 2);
    assert_eq!(report.content_by_country.top.len(), 2);
}

#[test]
fn empty_catalog_has_no_most_content_country() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_catalog(
        "undated.csv",
        &[CatalogRow {
            date_added: "",
            ..CatalogRow::default()
        }],
    );
    let table = data::load(&path).expect("load");
    let mut table = DataCleaner::clean(table).expect("clean");
    assert!(table.is_empty());

    let err = analyzer().analyze(&mut table).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyResult(_)));
}

#[test]
fn chart_specs_follow_report_order() {
    let mut table = cleaned_sample();
    let analyzer = analyzer();
    let report = analyzer.analyze(&mut table).unwrap();
    let charts = analyzer.chart_specs(&report);

    let names: Vec<&str> = charts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "correlation_heatmap",
            "top_genres",
            "type_distribution",
            "titles_per_year",
            "top_countries",
            "top_directors",
            "titles_by_release_year",
            "top_cast",
        ]
    );
    assert_eq!(charts[0].kind, ChartKind::Heatmap);
    assert_eq!(charts[3].kind, ChartKind::Line);
    assert_eq!(charts[6].kind, ChartKind::StackedBar);
    assert_eq!(charts[7].kind, ChartKind::HorizontalBar);
    match &charts[6].data {
        ChartData::Stacked { categories, series } => {
            assert_eq!(categories.len(), 7);
            assert_eq!(series.len(), 2);
        }
        other => panic!("unexpected chart data: {other:?}"),
    }
}

#[test]
fn pipeline_renders_every_chart() {
    let renderer = RecordingRenderer::default();
    let report = run_pipeline(
        &fixture_path(SAMPLE_FILE),
        &AnalysisConfig::default(),
        Some(&renderer),
    )
    .expect("pipeline");

    assert_eq!(report.rendered.len(), 8);
    assert!(report.warnings.is_empty());
    assert_eq!(renderer.charts.lock().unwrap().len(), 8);
}

#[test]
fn render_failures_become_warnings() {
    let report = run_pipeline(
        &fixture_path(SAMPLE_FILE),
        &AnalysisConfig::default(),
        Some(&FailingRenderer),
    )
    .expect("pipeline survives render failures");

    assert!(report.rendered.is_empty());
    assert_eq!(report.warnings.len(), 8);
    assert_eq!(report.content_by_country.most.count, 5);
}

#[test]
fn pipeline_reports_missing_file() {
    let workspace = TestWorkspace::new();
    let err = run_pipeline(
        &workspace.path().join("missing.csv"),
        &AnalysisConfig::default(),
        None,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("missing.csv"));
}

#[test]
fn analysis_does_not_reorder_rows() {
    let mut table = cleaned_sample();
    let before: Vec<String> = table
        .text_values(TITLE)
        .unwrap()
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    analyzer().analyze(&mut table).unwrap();
    let after: Vec<&str> = table.text_values(TITLE).unwrap().into_iter().flatten().collect();
    assert_eq!(before, after);
}
