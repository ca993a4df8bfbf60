#![cfg(feature = "plotting")]

use gwas_viz::layout::ChromOrder;
use gwas_viz::plotting::{plot_manhattan, plot_miami, plot_qq, PlotConfig, PlotFormat, XAxis};
use gwas_viz::types::{AnnotatedVariant, VariantRecord};
use gwas_viz::GwasPlotError;

fn small_config(format: PlotFormat) -> PlotConfig {
    PlotConfig {
        width: 800,
        height: 400,
        format,
        ..Default::default()
    }
}

fn study(seed: u64) -> Vec<VariantRecord> {
    let mut records = Vec::new();
    for chrom in 1..=4u64 {
        for i in 1..=50u64 {
            // Deterministic spread of p-values with one strong hit per chromosome
            let p = if i == 25 {
                10f64.powi(-(6 + ((chrom + seed) % 4) as i32))
            } else {
                ((i * 37 + chrom * 11 + seed) % 97 + 1) as f64 / 98.0
            };
            records.push(VariantRecord::new(chrom.to_string(), i * 1000, format!("rs{}_{}", chrom, i), p));
        }
    }
    records
}

fn exists_non_empty(path: &std::path::Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

#[test]
fn manhattan_png_with_labels() {
    let dir = tempfile::tempdir().unwrap();
    let records = study(0);
    let annots = vec![
        AnnotatedVariant::new("rs1_25", "GENE1"),
        AnnotatedVariant::new("rs2_25", "GENE2"),
        AnnotatedVariant::new("rs_absent", "NA"),
    ];
    let config = PlotConfig {
        annotate: true,
        ..small_config(PlotFormat::Png)
    };

    let path = plot_manhattan(&records, Some(annots.as_slice()), dir.path(), &config).unwrap();
    assert_eq!(path, dir.path().join("manhattan_plot.png"));
    assert!(exists_non_empty(&path));
}

#[test]
fn manhattan_svg_genomic_axis() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlotConfig {
        x_axis: XAxis::Genomic,
        chrom_order: ChromOrder::FirstSeen,
        ..small_config(PlotFormat::Svg)
    };

    let path = plot_manhattan(&study(1), None, dir.path(), &config).unwrap();
    assert_eq!(path.extension().unwrap(), "svg");
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn manhattan_rejects_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let err = plot_manhattan(&[], None, dir.path(), &small_config(PlotFormat::Png)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GwasPlotError>(),
        Some(GwasPlotError::EmptyInput)
    ));
}

#[test]
fn manhattan_creates_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("plots").join("run1");
    let path = plot_manhattan(&study(2), None, &nested, &small_config(PlotFormat::Png)).unwrap();
    assert!(exists_non_empty(&path));
}

#[test]
fn qq_png() {
    let dir = tempfile::tempdir().unwrap();
    let p: Vec<f64> = study(0).iter().map(|r| r.p_value).collect();
    let path = plot_qq(&p, dir.path(), &small_config(PlotFormat::Png)).unwrap();
    assert_eq!(path, dir.path().join("qq_plot.png"));
    assert!(exists_non_empty(&path));
}

#[test]
fn qq_single_value_renders() {
    let dir = tempfile::tempdir().unwrap();
    let path = plot_qq(&[0.01], dir.path(), &small_config(PlotFormat::Svg)).unwrap();
    assert!(exists_non_empty(&path));
}

#[test]
fn miami_with_classified_highlights() {
    let dir = tempfile::tempdir().unwrap();
    let top = study(0);
    let mut bottom = study(3);
    // Bottom study also covers a chromosome the top one lacks
    bottom.push(VariantRecord::new("5", 2000, "rs5_1", 1e-7));

    let top_hl = vec![
        AnnotatedVariant::new("rs1_25", "SHARED"),
        AnnotatedVariant::new("rs2_25", "TOPGENE"),
    ];
    let bottom_hl = vec![
        AnnotatedVariant::new("rs1_25", "SHARED"),
        AnnotatedVariant::new("rs5_1", "BOTTOMGENE"),
    ];

    let path = plot_miami(
        &top,
        Some(top_hl.as_slice()),
        &bottom,
        Some(bottom_hl.as_slice()),
        dir.path(),
        &small_config(PlotFormat::Png),
    )
    .unwrap();
    assert_eq!(path, dir.path().join("miami_plot.png"));
    assert!(exists_non_empty(&path));
}

#[test]
fn miami_one_side_annotated() {
    let dir = tempfile::tempdir().unwrap();
    let top_hl = vec![AnnotatedVariant::new("rs3_25", "ONLYTOP")];
    let path = plot_miami(
        &study(0),
        Some(top_hl.as_slice()),
        &study(1),
        None,
        dir.path(),
        &small_config(PlotFormat::Svg),
    )
    .unwrap();
    assert!(exists_non_empty(&path));
}

#[test]
fn miami_rejects_unknown_explicit_chromosome() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlotConfig {
        chrom_order: ChromOrder::Explicit(vec!["1".into(), "2".into()]),
        ..small_config(PlotFormat::Png)
    };
    let err = plot_miami(&study(0), None, &study(1), None, dir.path(), &config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GwasPlotError>(),
        Some(GwasPlotError::UnknownChromosome(_))
    ));
}
