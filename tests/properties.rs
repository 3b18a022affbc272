use proptest::prelude::*;
use slice_oracle::assemble::Reassembler;
use slice_oracle::manifest::Compression;
use slice_oracle::pipeline::{decode_input, encoded_len, slice, ChunkSpec, EncodedBlob};
use slice_oracle::{fingerprint, MetaReport};

proptest! {
    #[test]
    fn roundtrip_recovers_input(input in any::<String>()) {
        let blob = EncodedBlob::from_input(&input, Compression::Gzip).unwrap();
        prop_assert_eq!(decode_input(&blob.encoded, Compression::Gzip).unwrap(), input);
    }

    #[test]
    fn fingerprint_depends_on_exact_bytes(input in ".*", suffix in "[ \t\r\n]{1,3}") {
        prop_assert_eq!(fingerprint(&input), fingerprint(&input.clone()));
        let extended = format!("{}{}", input, suffix);
        prop_assert_ne!(fingerprint(&input), fingerprint(&extended));
    }

    #[test]
    fn meta_report_is_self_consistent(input in any::<String>()) {
        let blob = EncodedBlob::from_input(&input, Compression::Gzip).unwrap();
        let report = MetaReport::from_blob(&input, &blob);
        prop_assert_eq!(report.compressed_length, blob.compressed.len());
        prop_assert_eq!(report.encoded_length, encoded_len(blob.compressed.len()));
        prop_assert!(report.is_consistent());
        prop_assert_eq!(MetaReport::parse(&report.render()).unwrap(), report);
    }

    #[test]
    fn slice_matches_window_arithmetic(
        text in "[A-Za-z0-9+/=]{0,300}",
        offset in 0usize..400,
        size in 1usize..200,
    ) {
        let window = slice(&text, ChunkSpec::new(offset, size).unwrap());
        let expected = if offset >= text.len() {
            ""
        } else {
            &text[offset..offset + size.min(text.len() - offset)]
        };
        prop_assert_eq!(window, expected);
    }

    #[test]
    fn planned_windows_reconstruct_input(input in any::<String>(), size in 1usize..64) {
        let blob = EncodedBlob::from_input(&input, Compression::Gzip).unwrap();
        let mut reassembler = Reassembler::new(MetaReport::from_blob(&input, &blob), Compression::Gzip);
        for spec in ChunkSpec::plan(blob.encoded_len(), size).unwrap() {
            reassembler.add_window(spec.offset, slice(&blob.encoded, spec)).unwrap();
        }
        prop_assert_eq!(reassembler.assemble().unwrap(), blob.encoded.clone());
        prop_assert_eq!(reassembler.finish().unwrap(), input);
    }

    #[test]
    fn overlapping_windows_reconstruct_input(input in ".{0,200}", size in 4usize..40, step_frac in 1usize..4) {
        let step = (size * step_frac / 4).max(1);
        let blob = EncodedBlob::from_input(&input, Compression::Gzip).unwrap();
        let mut reassembler = Reassembler::new(MetaReport::from_blob(&input, &blob), Compression::Gzip);
        let mut offset = 0;
        while offset < blob.encoded_len() {
            reassembler.add_window(offset, slice(&blob.encoded, ChunkSpec::new(offset, size).unwrap())).unwrap();
            offset += step;
        }
        prop_assert_eq!(reassembler.finish().unwrap(), input);
    }
}
