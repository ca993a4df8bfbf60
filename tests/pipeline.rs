use approx::assert_relative_eq;
use std::io::Write;
use std::path::Path;

use gwas_viz::classify::classify;
use gwas_viz::confidence::{band_polygon, confidence_band};
use gwas_viz::csv_reader::{load_annotation_table, load_association_table};
use gwas_viz::highlight::resolve;
use gwas_viz::layout::{ChromOrder, GenomeLayout};
use gwas_viz::output::write_cojo_input;
use gwas_viz::quantiles::{prepare_qq, qq_points};
use gwas_viz::thinning::thin;
use gwas_viz::types::{neg_log10, AnnotatedVariant, QqPoint, GENOME_WIDE_P};

const ASSOC: &str = "CHR\tSNP\tPOS\tA1\tA2\tN\tfreq\tb\tse\tp\n\
                     1\trs1\t100\tA\tG\t500\t0.25\t0.10\t0.02\t1e-9\n\
                     1\trs2\t200\tC\tT\t500\t0.40\t-0.01\t0.03\t0.5\n\
                     2\trs3\t50\tG\tA\t500\t0.12\t0.05\t0.02\t0.01\n\
                     2\trs4\t300\tT\tC\t500\t0.33\t0.08\t0.01\t5e-8\n";

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn manhattan_coordinates_from_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "assoc.fastGWA", ASSOC);
    let records = load_association_table(&path).unwrap();

    let layout = GenomeLayout::from_records(&records, &ChromOrder::Natural).unwrap();
    let points = layout.place(&records, None).unwrap();

    let rel: Vec<u64> = points.iter().map(|p| p.relative_pos).collect();
    assert_eq!(rel, vec![100, 200, 250, 500]);
    assert_eq!(layout.chromosomes()[0].length, 200);
    assert_eq!(layout.chromosomes()[1].offset, 200);

    let line = neg_log10(GENOME_WIDE_P);
    assert_relative_eq!(line, 7.30103, epsilon = 1e-5);
    assert!(points[0].neg_log10_p > line);
}

#[test]
fn later_chromosomes_sit_strictly_right() {
    let dir = tempfile::tempdir().unwrap();
    let table = "CHR,SNP,bp,p\n\
                 10,a,5,0.1\n\
                 2,b,900,0.2\n\
                 X,c,1,0.3\n\
                 2,d,1,0.4\n\
                 1,e,1000,0.5\n\
                 10,f,70,0.6\n";
    let path = write_file(dir.path(), "assoc.csv", table);
    let records = load_association_table(&path).unwrap();

    let layout = GenomeLayout::from_records(&records, &ChromOrder::Natural).unwrap();
    let points = layout.place(&records, None).unwrap();

    for a in &points {
        for b in &points {
            if a.chrom_index < b.chrom_index {
                assert!(b.relative_pos > a.relative_pos, "{:?} vs {:?}", a, b);
            }
        }
    }
}

#[test]
fn qq_first_rank_matches_smallest_p() {
    let p = [0.3, 0.1, 0.5, 0.2, 0.4];
    let points = qq_points(&p);
    assert_relative_eq!(points[1].expected, 1.0, epsilon = 1e-12);
    assert_relative_eq!(points[1].observed, 1.0, epsilon = 1e-12);

    let qq = prepare_qq(&p, 1500, 0.05).unwrap();
    assert_eq!(qq.n, 5);
    assert_eq!(qq.band.len(), 4);
    assert_eq!(qq.points.len(), 5);
}

#[test]
fn band_polygon_has_two_vertices_per_rank() {
    for (n, budget) in [(10, 1500), (2000, 1500), (2, 3)] {
        let band = confidence_band(n, budget, 0.05).unwrap();
        assert_eq!(band_polygon(&band).len(), 2 * budget.min(n - 1));
    }

    let band = confidence_band(50, 1500, 1.0).unwrap();
    for b in &band {
        assert_relative_eq!(b.upper, b.lower, epsilon = 1e-9);
    }
}

#[test]
fn thinning_is_idempotent_on_qq_points() {
    let p: Vec<f64> = (1..=3000).map(|i| (i % 700) as f64 / 700.0 + 1e-4).collect();
    let points = qq_points(&p);
    let once = thin(&points);
    let twice: Vec<QqPoint> = thin(&once);
    assert_eq!(once, twice);
    assert!(once.len() <= points.len());
}

#[test]
fn classifier_partitions_union() {
    let dir = tempfile::tempdir().unwrap();
    let top_path = write_file(dir.path(), "top.tsv", "SNP\tGENE\nA\tg1\nB\tg2\nC\tg3\n");
    let bottom_path = write_file(dir.path(), "bottom.tsv", "SNP\tGENE\nB\tg2\nC\tNA\nD\tg4\n");

    let top = load_annotation_table(&top_path).unwrap();
    let bottom = load_annotation_table(&bottom_path).unwrap();
    let c = classify(&top, &bottom);

    let ids = |v: &[gwas_viz::types::ClassifiedAnnotation]| -> Vec<String> { v.iter().map(|a| a.id.clone()).collect() };
    assert_eq!(ids(&c.on_both), vec!["B", "C"]);
    assert_eq!(ids(&c.top_only), vec!["A"]);
    assert_eq!(ids(&c.bottom_only), vec!["D"]);
    assert_eq!(c.len(), 4);
    // Top metadata wins for variants on both sides
    assert_eq!(c.on_both[1].gene, "g3");
}

#[test]
fn annotations_resolve_against_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "assoc.fastGWA", ASSOC);
    let records = load_association_table(&path).unwrap();
    let layout = GenomeLayout::from_records(&records, &ChromOrder::Natural).unwrap();
    let points = layout.place(&records, None).unwrap();

    let annots = vec![
        AnnotatedVariant::new("rs4", "GENE4"),
        AnnotatedVariant::new("rs_not_there", "NA"),
    ];
    let hl = resolve(&points, &records, &annots);
    assert_eq!(hl.len(), 1);
    assert_eq!(hl[0].point.relative_pos, 500);
}

#[test]
fn cojo_input_from_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "assoc.fastGWA", ASSOC);
    let records = load_association_table(&path).unwrap();

    let out = dir.path().join("cojo_file.ma");
    write_cojo_input(&records, &out).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "SNP\tA1\tA2\tfreq\tb\tse\tp\tN");
    assert!(lines[4].starts_with("rs4\tT\tC\t0.33\t0.08\t0.01\t"));
}
