use anyhow::Result;
use aeon_ops::{
    DType, FeatureMapLayout, OperandRef, QuantParams, Shape, TensorType, UnaryElementwiseBuilder,
};

fn main() -> Result<()> {
    let node = UnaryElementwiseBuilder::new(
        OperandRef(0),
        OperandRef(1),
        "ABS",
        QuantParams::new(0.25, -128),
        QuantParams::new(0.25, -128),
        20,
    )
    .ofm_layout(FeatureMapLayout::Nhcwb16)
    .build();

    let ifm = TensorType::new(DType::Si8, Shape::new([1, 32, 32, 20]));
    let lut = TensorType::new(DType::Ui8, Shape::new([256]));

    let output = node.type_check(&[ifm, lut])?;
    println!("{node}");
    println!("output type: {output}");
    println!("serialized:\n{}", node.to_json_string()?);

    Ok(())
}
