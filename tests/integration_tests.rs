//! Integration tests for htsget-resolve
//!
//! Fixtures are written to a temporary data directory and resolved through
//! the filesystem storage backend.

use htsget_resolve::{
    ErrorKind, Resolver,
    resolve::DEFAULT_BLOCK_SIZE_LIMIT,
    storage::LocalStorage,
    types::{Format, RegionQuery, ResolvedRanges},
};
use noodles::bgzf::{self, VirtualPosition};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

fn vo(compressed: u64) -> u64 {
    compressed << 16
}

fn bgzf_compress(data: &[u8]) -> Vec<u8> {
    let mut writer = bgzf::Writer::new(Vec::new());
    writer.write_all(data).unwrap();
    writer.finish().unwrap()
}

/// Bins of one reference: `(bin id, bin offset, chunks)`.
type Bins<'a> = &'a [(u32, u64, &'a [(u64, u64)])];

fn csi_index(refs: &[Bins]) -> Vec<u8> {
    let mut buf = b"CSI\x01".to_vec();
    buf.extend(14i32.to_le_bytes());
    buf.extend(5i32.to_le_bytes());
    buf.extend(0i32.to_le_bytes());
    buf.extend((refs.len() as i32).to_le_bytes());
    for bins in refs {
        buf.extend((bins.len() as i32).to_le_bytes());
        for (id, offset, chunks) in bins.iter() {
            buf.extend(id.to_le_bytes());
            buf.extend(offset.to_le_bytes());
            buf.extend((chunks.len() as i32).to_le_bytes());
            for (start, end) in chunks.iter() {
                buf.extend(start.to_le_bytes());
                buf.extend(end.to_le_bytes());
            }
        }
    }
    bgzf_compress(&buf)
}

fn bai_index(refs: &[Bins]) -> Vec<u8> {
    let mut buf = b"BAI\x01".to_vec();
    buf.extend((refs.len() as i32).to_le_bytes());
    for bins in refs {
        buf.extend((bins.len() as i32).to_le_bytes());
        for (id, _, chunks) in bins.iter() {
            buf.extend(id.to_le_bytes());
            buf.extend((chunks.len() as i32).to_le_bytes());
            for (start, end) in chunks.iter() {
                buf.extend(start.to_le_bytes());
                buf.extend(end.to_le_bytes());
            }
        }
        buf.extend(1i32.to_le_bytes());
        buf.extend(0u64.to_le_bytes());
    }
    buf
}

fn bcf_file(contigs: &[&str]) -> Vec<u8> {
    let mut text = String::from("##fileformat=VCFv4.2\n");
    for contig in contigs {
        text.push_str(&format!("##contig=<ID={},length=1000000>\n", contig));
    }
    text.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\0");

    let mut buf = b"BCF\x02\x02".to_vec();
    buf.extend((text.len() as u32).to_le_bytes());
    buf.extend(text.as_bytes());
    bgzf_compress(&buf)
}

fn bam_file(references: &[&str]) -> Vec<u8> {
    let text = "@HD\tVN:1.6\tSO:coordinate\n";
    let mut buf = b"BAM\x01".to_vec();
    buf.extend((text.len() as i32).to_le_bytes());
    buf.extend(text.as_bytes());
    buf.extend((references.len() as i32).to_le_bytes());
    for name in references {
        buf.extend((name.len() as i32 + 1).to_le_bytes());
        buf.extend(name.as_bytes());
        buf.push(0);
        buf.extend(1_000_000i32.to_le_bytes());
    }
    bgzf_compress(&buf)
}

fn write(dir: &Path, name: &str, data: &[u8]) {
    std::fs::write(dir.join(name), data).unwrap();
}

fn create_resolver(dir: &Path) -> Resolver {
    let storage = Arc::new(LocalStorage::new(dir.to_path_buf()));
    Resolver::new(storage, DEFAULT_BLOCK_SIZE_LIMIT)
}

fn query(name: &str, start: u64, end: u64) -> RegionQuery {
    RegionQuery {
        reference_name: Some(name.to_string()),
        start: Some(start),
        end: Some(end),
    }
}

fn variants_fixture(dir: &Path) {
    write(dir, "sample.bcf.gz", &bcf_file(&["chr1", "chr2"]));
    write(
        dir,
        "sample.bcf.gz.csi",
        &csi_index(&[
            &[
                (37450, 0, &[(vo(1), vo(2)), (0, 7)]),
                (4691, vo(1_000), &[(vo(1_000), vo(5_000))]),
                (10407, vo(9_000_000), &[(vo(9_000_000), vo(9_010_000))]),
            ],
            &[(4681, 0, &[(vo(20_000_000), vo(20_000_500))])],
        ]),
    );
}

#[tokio::test]
async fn test_variants_region_spanning_one_bin() {
    let dir = tempfile::tempdir().unwrap();
    variants_fixture(dir.path());

    let chunks = create_resolver(dir.path())
        .resolve("sample.bcf.gz", Format::Bcf, &query("chr1", 93_822_816, 93_825_705))
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].start, VirtualPosition::MIN);
    assert_eq!(chunks[0].end, VirtualPosition::from(vo(1_000)));
    assert_eq!(chunks[1].start, VirtualPosition::from(vo(9_000_000)));
}

#[tokio::test]
async fn test_variants_first_megabase() {
    let dir = tempfile::tempdir().unwrap();
    variants_fixture(dir.path());

    let chunks = create_resolver(dir.path())
        .resolve("sample.bcf.gz", Format::Bcf, &query("chr1", 0, 1_000_000))
        .await
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].end, VirtualPosition::from(vo(5_000)));
}

#[tokio::test]
async fn test_variants_second_reference() {
    let dir = tempfile::tempdir().unwrap();
    variants_fixture(dir.path());

    let chunks = create_resolver(dir.path())
        .resolve("sample.bcf.gz", Format::Bcf, &query("chr2", 0, 100))
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].start, VirtualPosition::from(vo(20_000_000)));
}

#[tokio::test]
async fn test_variants_index_without_data_extension() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sample.bcf.gz", &bcf_file(&["chr1"]));
    write(
        dir.path(),
        "sample.csi",
        &csi_index(&[&[(4681, 0, &[(vo(10), vo(20))])]]),
    );

    let chunks = create_resolver(dir.path())
        .resolve("sample.bcf.gz", Format::Bcf, &query("chr1", 0, 100))
        .await
        .unwrap();
    assert_eq!(chunks.len(), 1);
}

#[tokio::test]
async fn test_reads_with_bai() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "mt.bam", &bam_file(&["chrM", "chr1"]));
    write(
        dir.path(),
        "mt.bam.bai",
        &bai_index(&[
            &[(4681, 0, &[(vo(100), vo(200))])],
            &[(4681, 0, &[(vo(400_000), vo(400_300))])],
        ]),
    );

    let chunks = create_resolver(dir.path())
        .resolve("mt.bam", Format::Bam, &query("chr1", 0, 1_000))
        .await
        .unwrap();

    let output = serde_json::to_value(ResolvedRanges::new(Format::Bam, &chunks)).unwrap();
    assert_eq!(output["format"], "BAM");

    let ranges = output["ranges"].as_array().unwrap();
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0]["start"], 0);
    assert_eq!(ranges[0]["end"], 100);
    assert_eq!(ranges[1]["start"], 400_000);
    assert_eq!(ranges[1]["end"], 400_300);
}

#[tokio::test]
async fn test_reference_not_found() {
    let dir = tempfile::tempdir().unwrap();
    variants_fixture(dir.path());

    let err = create_resolver(dir.path())
        .resolve("sample.bcf.gz", Format::Bcf, &query("chrZ", 0, 100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.error_type(), "NotFound");
}

#[tokio::test]
async fn test_missing_index() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "mt.bam", &bam_file(&["chrM"]));

    let err = create_resolver(dir.path())
        .resolve("mt.bam", Format::Bam, &query("chrM", 0, 100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageAccess);
}

#[tokio::test]
async fn test_corrupt_index() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "mt.bam", &bam_file(&["chrM"]));
    write(dir.path(), "mt.bam.bai", b"BAI\x01\x05\x00");

    let err = create_resolver(dir.path())
        .resolve("mt.bam", Format::Bam, &query("chrM", 0, 100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().starts_with("reading index: reading reference count"));
}

#[tokio::test]
async fn test_output_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    variants_fixture(dir.path());

    let chunks = create_resolver(dir.path())
        .resolve("sample.bcf.gz", Format::Bcf, &query("chr1", 93_822_816, 93_825_705))
        .await
        .unwrap();
    let output: Value =
        serde_json::to_value(ResolvedRanges::new(Format::Bcf, &chunks)).unwrap();

    assert_eq!(output["ranges"][0]["virtualStart"], 0);
    assert_eq!(output["ranges"][0]["virtualEnd"], vo(1_000));
    assert_eq!(output["ranges"][1]["end"], 9_010_000);
}
