use avgbin_stego::{
    build_eligibility_mask, capacity, compute_bin_statistics, eligible, embed, extract,
    extract_with, BitSequence, ExtractOptions, IntensityMatrix, PerPixelReference,
};
use proptest::prelude::*;

fn matrix(rows: &[Vec<i64>]) -> IntensityMatrix {
    IntensityMatrix::from_rows(rows).unwrap()
}

/// Deterministic textured cover, large enough for SSIM.
fn textured_cover(height: usize, width: usize) -> IntensityMatrix {
    let data: Vec<u8> = (0..height * width)
        .map(|i| ((i * 37 + (i / 7) * 11) % 256) as u8)
        .collect();
    IntensityMatrix::from_column_major(height, width, data).unwrap()
}

fn alternating_bits(n: usize) -> BitSequence {
    (0..n).map(|i| (i % 3 == 0) as u8).collect()
}

#[test]
fn two_by_two_reference_scenario() {
    let cover = matrix(&[vec![10, 100], vec![200, 50]]);
    assert_eq!(cover.as_column_major(), &[10, 200, 100, 50]);
    assert_eq!(capacity(&cover), 4);

    let table = compute_bin_statistics(&cover);
    for &p in cover.as_column_major() {
        assert_eq!(table.average_for(p), p);
    }

    let bits = BitSequence::new(vec![1, 0, 1, 0]);
    let result = embed(&cover, &bits);
    for (t, (&p, &s)) in cover
        .as_column_major()
        .iter()
        .zip(result.stego.as_column_major())
        .enumerate()
    {
        let avg = i32::from(table.average_for(p));
        let bit = i32::from(bits.as_slice()[t]);
        let expected = (2 * i32::from(p) - avg + bit).clamp(0, 255);
        assert_eq!(i32::from(s), expected);
    }

    let out = extract(&cover, &result.stego, result.bits_used).unwrap();
    assert_eq!(out.bits, bits);
    assert_eq!(out.reconstructed, cover);
}

#[test]
fn full_size_round_trip_with_metrics() {
    let cover = textured_cover(32, 40);
    let bits = alternating_bits(700);
    let result = embed(&cover, &bits);

    assert_eq!(result.bits_used, 700.min(capacity(&cover)));
    assert!(result.mse > 0.0);
    assert!(result.psnr.is_finite());
    assert!(result.ssim > 0.0 && result.ssim <= 1.0);

    let out = extract(&cover, &result.stego, result.bits_used).unwrap();
    assert_eq!(out.bits, bits.prefix(result.bits_used));
    assert_eq!(out.reconstructed, cover);
}

#[test]
fn all_zero_change_gives_infinite_psnr() {
    // Every pixel is alone in its bin, so avg == p and a 0 bit changes nothing.
    let cover = matrix(&[vec![10, 40, 70], vec![100, 130, 160]]);
    let result = embed(&cover, &BitSequence::new(vec![0; 6]));
    assert_eq!(result.bits_used, 6);
    assert_eq!(result.stego, cover);
    assert_eq!(result.mse, 0.0);
    assert_eq!(result.psnr, f64::INFINITY);
}

#[test]
fn self_derived_references_never_saturate() {
    // Extremes of every bin: eligible pixels stay within [1, 254] after embedding.
    let row: Vec<i64> = (0..=255).collect();
    let cover = matrix(&[row.clone(), row.iter().rev().copied().collect()]);
    for bit in [0u8, 1] {
        let result = embed(&cover, &BitSequence::new(vec![bit; 600]));
        for (&p, &s) in cover
            .as_column_major()
            .iter()
            .zip(result.stego.as_column_major())
        {
            if eligible(p) {
                assert!((1..=254).contains(&s), "pixel {} became {}", p, s);
            }
        }
    }
}

#[test]
fn clipped_pixel_is_an_accepted_loss() {
    let cover = matrix(&[vec![248, 30]]);
    // A reference far below the pixel pushes 2*248 - 230 + 1 = 267 past 255.
    let reference = PerPixelReference::from_column_major(vec![230, 30]);
    let bits = BitSequence::new(vec![1, 1]);
    let result = avgbin_stego::embed_with_reference(&cover, &bits, &reference).unwrap();
    assert_eq!(result.stego.get(0, 0), Some(255));

    let options = ExtractOptions {
        reference: Some(&reference),
        mask: None,
    };
    let out = extract_with(&cover, &result.stego, 2, options).unwrap();
    // The clipped position does not reproduce the cover pixel; the other one does.
    assert_ne!(out.reconstructed.get(0, 0), Some(248));
    assert_eq!(out.reconstructed.get(0, 1), Some(30));
    assert_eq!(out.bits.as_slice()[1], 1);
}

#[test]
fn wrong_budget_misaligns_bits() {
    let cover = textured_cover(12, 12);
    let bits = alternating_bits(50);
    let result = embed(&cover, &bits);

    let short = extract(&cover, &result.stego, 20).unwrap();
    assert_eq!(short.bits, bits.prefix(20));
    // Positions 20..50 are copied from the stego image, so the cover is not restored.
    assert_ne!(short.reconstructed, cover);
}

fn cover_strategy() -> impl Strategy<Value = IntensityMatrix> {
    (0usize..14, 0usize..14).prop_flat_map(|(h, w)| {
        prop::collection::vec(any::<u8>(), h * w)
            .prop_map(move |data| IntensityMatrix::from_column_major(h, w, data).unwrap())
    })
}

fn bits_strategy() -> impl Strategy<Value = BitSequence> {
    prop::collection::vec(0u8..=1, 0..250).prop_map(BitSequence::new)
}

proptest! {
    #[test]
    fn prop_bits_used_is_min_of_len_and_capacity(
        cover in cover_strategy(),
        bits in bits_strategy(),
    ) {
        let expected_capacity = cover
            .as_column_major()
            .iter()
            .filter(|&&v| v > 4 && v <= 249)
            .count();
        prop_assert_eq!(capacity(&cover), expected_capacity);
        prop_assert_eq!(embed(&cover, &bits).bits_used, bits.len().min(expected_capacity));
    }

    #[test]
    fn prop_mask_marks_first_eligible_positions(cover in cover_strategy(), n in 0usize..250) {
        let mask = build_eligibility_mask(&cover, n);
        let expected: Vec<usize> = cover
            .as_column_major()
            .iter()
            .enumerate()
            .filter(|(_, &v)| eligible(v))
            .map(|(i, _)| i)
            .take(n)
            .collect();
        prop_assert_eq!(mask.marked_count(), n.min(capacity(&cover)));
        prop_assert_eq!(mask.marked_positions().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_round_trip_restores_bits_and_cover(cover in cover_strategy(), bits in bits_strategy()) {
        let result = embed(&cover, &bits);
        let out = extract(&cover, &result.stego, result.bits_used).unwrap();
        prop_assert_eq!(out.bits, bits.prefix(result.bits_used));
        prop_assert_eq!(out.reconstructed, cover);
    }

    #[test]
    fn prop_embedding_is_deterministic(cover in cover_strategy(), bits in bits_strategy()) {
        let a = embed(&cover, &bits);
        let b = embed(&cover, &bits);
        prop_assert_eq!(&a.stego, &b.stego);
        prop_assert_eq!(a.bits_used, b.bits_used);
        prop_assert_eq!(a.mse.to_bits(), b.mse.to_bits());
        prop_assert_eq!(a.psnr.to_bits(), b.psnr.to_bits());
        prop_assert_eq!(a.ssim.to_bits(), b.ssim.to_bits());
    }
}
