use aeon_ops::attrs::{OpAttrs, UnaryElementwiseAttrs};
use aeon_ops::layout::FeatureMapLayout;
use aeon_ops::registry::{self, UNARY_ELEMENTWISE};
use aeon_ops::relation::TypeCheckError;
use aeon_ops::spec::{DType, Shape, TensorType};

fn attrs(operator_type: &str, ofm_channels: usize) -> UnaryElementwiseAttrs {
    UnaryElementwiseAttrs {
        operator_type: operator_type.to_string(),
        ifm_scale: 0.5,
        ifm_zero_point: -128,
        ofm_scale: 0.5,
        ofm_zero_point: -128,
        ofm_channels,
        activation: Default::default(),
        clip_min: 0,
        clip_max: 0,
        rounding_mode: Default::default(),
        ifm_layout: Default::default(),
        ofm_layout: Default::default(),
    }
}

fn ifm(dtype: DType, dims: &[usize]) -> TensorType {
    TensorType::new(dtype, Shape::new(dims.to_vec()))
}

fn lut() -> TensorType {
    TensorType::new(DType::Ui8, Shape::new([256]))
}

fn infer(inputs: &[TensorType], attrs: UnaryElementwiseAttrs) -> Result<TensorType, TypeCheckError> {
    let entry = registry::global()
        .lookup(UNARY_ELEMENTWISE)
        .expect("unary elementwise should be registered");
    entry.infer(inputs, &OpAttrs::UnaryElementwise(attrs))
}

#[test]
fn abs_on_int8_propagates_element_type() {
    let output = infer(&[ifm(DType::Si8, &[1, 4, 4, 8]), lut()], attrs("ABS", 8))
        .expect("int8 ABS should type-check");
    assert_eq!(output.dtype, DType::Si8);
}

#[test]
fn abs_on_uint8_propagates_element_type() {
    let output = infer(&[ifm(DType::Ui8, &[1, 4, 4, 8]), lut()], attrs("ABS", 8))
        .expect("uint8 ABS should type-check");
    assert_eq!(output.dtype, DType::Ui8);
}

#[test]
fn output_shape_matches_declared_nhwc_contract() {
    let output = infer(&[ifm(DType::Si8, &[1, 4, 4, 8]), lut()], attrs("ABS", 8))
        .expect("ABS should type-check");
    assert_eq!(output.shape.dims(), &[1, 4, 4, 8]);
}

#[test]
fn output_shape_is_bricked_when_ofm_layout_is_nhcwb16() {
    let mut attrs = attrs("ABS", 8);
    attrs.ofm_layout = FeatureMapLayout::Nhcwb16;
    let output = infer(&[ifm(DType::Si8, &[1, 4, 4, 8]), lut()], attrs)
        .expect("bricked OFM should type-check");
    assert_eq!(output.shape.dims(), &[1, 4, 1, 4, 16]);
}

#[test]
fn partial_brick_rounds_up_to_two_bricks() {
    let mut attrs = attrs("ABS", 20);
    attrs.ofm_layout = FeatureMapLayout::Nhcwb16;
    let output = infer(&[ifm(DType::Si8, &[1, 4, 4, 20]), lut()], attrs)
        .expect("20-channel OFM should type-check");
    assert_eq!(output.shape.dims(), &[1, 4, 2, 4, 16]);
}

#[test]
fn bricked_input_channels_are_discarded_in_favor_of_declared_count() {
    let mut attrs = attrs("ABS", 20);
    attrs.ifm_layout = FeatureMapLayout::Nhcwb16;
    let output = infer(&[ifm(DType::Si8, &[1, 4, 2, 4, 16]), lut()], attrs)
        .expect("bricked IFM should type-check");
    assert_eq!(output.shape.dims(), &[1, 4, 4, 20]);
}

#[test]
fn variants_other_than_abs_are_rejected_with_the_exact_string() {
    for variant in ["SQRT", "MEAN", "abs", ""] {
        let err = infer(&[ifm(DType::Si8, &[1, 4, 4, 8]), lut()], attrs(variant, 8))
            .expect_err("unsupported variant should fail");
        match err {
            TypeCheckError::UnsupportedVariant { found, .. } => assert_eq!(found, variant),
            other => panic!("expected UnsupportedVariant, got {other:?}"),
        }
    }
}

#[test]
fn non_quantized_element_types_are_rejected() {
    for dtype in [DType::Si16, DType::Ui16, DType::Si32, DType::F16, DType::F32] {
        let err = infer(&[ifm(dtype, &[1, 4, 4, 8]), lut()], attrs("ABS", 8))
            .expect_err("non-8-bit IFM should fail");
        match err {
            TypeCheckError::UnsupportedElementType { found, .. } => assert_eq!(found, dtype),
            other => panic!("expected UnsupportedElementType, got {other:?}"),
        }
    }
}

#[test]
fn missing_lut_operand_is_an_arity_mismatch() {
    let err = infer(&[ifm(DType::Si8, &[1, 4, 4, 8])], attrs("ABS", 8))
        .expect_err("single input should fail");
    assert_eq!(
        err,
        TypeCheckError::ArityMismatch {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn extra_operands_are_an_arity_mismatch() {
    let inputs = [ifm(DType::Si8, &[1, 4, 4, 8]), lut(), lut()];
    let err = infer(&inputs, attrs("ABS", 8)).expect_err("three inputs should fail");
    assert_eq!(
        err,
        TypeCheckError::ArityMismatch {
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn lut_operand_type_is_not_validated() {
    let odd_lut = TensorType::new(DType::F32, Shape::new([2, 2]));
    let output = infer(&[ifm(DType::Si8, &[1, 4, 4, 8]), odd_lut], attrs("ABS", 8))
        .expect("LUT contents are not checked by this relation");
    assert_eq!(output.dtype, DType::Si8);
}

#[test]
fn variant_check_runs_before_element_type_check() {
    let err = infer(&[ifm(DType::F32, &[1, 4, 4, 8]), lut()], attrs("SQRT", 8))
        .expect_err("both variant and dtype are invalid");
    assert!(
        matches!(err, TypeCheckError::UnsupportedVariant { .. }),
        "variant failure should win: {err:?}"
    );
}

#[test]
fn rank_mismatch_against_declared_nhwc_layout_is_rejected() {
    let err = infer(&[ifm(DType::Si8, &[1, 4, 2, 4, 16]), lut()], attrs("ABS", 8))
        .expect_err("rank-5 shape under NHWC should fail");
    assert_eq!(
        err,
        TypeCheckError::LayoutRankMismatch {
            layout: FeatureMapLayout::Nhwc,
            expected: 4,
            found: 5
        }
    );
}

#[test]
fn rank_mismatch_against_declared_bricked_layout_is_rejected() {
    let mut attrs = attrs("ABS", 8);
    attrs.ifm_layout = FeatureMapLayout::Nhcwb16;
    let err = infer(&[ifm(DType::Si8, &[1, 4, 4, 8]), lut()], attrs)
        .expect_err("rank-4 shape under NHCWB16 should fail");
    assert_eq!(
        err,
        TypeCheckError::LayoutRankMismatch {
            layout: FeatureMapLayout::Nhcwb16,
            expected: 5,
            found: 4
        }
    );
}

#[test]
fn inference_is_deterministic() {
    let inputs = [ifm(DType::Si8, &[1, 4, 4, 20]), lut()];
    let first = infer(&inputs, attrs("ABS", 20)).expect("first run");
    let second = infer(&inputs, attrs("ABS", 20)).expect("second run");
    assert_eq!(first, second);
}
