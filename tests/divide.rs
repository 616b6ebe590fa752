use tessera::{
    BandFormat, DemandStyle, Image, ImageHeader, Rect, SampleBuffer, TesseraError,
};

fn leaf(width: u32, height: u32, bands: u32, buffer: SampleBuffer) -> Image {
    let header =
        ImageHeader::new(width, height, bands, buffer.format(), DemandStyle::Any).unwrap();
    Image::from_buffer(header, buffer).unwrap()
}

/// All-`value` buffer with `scalars` scalar slots in the given format.
fn filled(format: BandFormat, scalars: usize, value: f64) -> SampleBuffer {
    match format {
        BandFormat::UChar => SampleBuffer::UChar(vec![value as u8; scalars]),
        BandFormat::Char => SampleBuffer::Char(vec![value as i8; scalars]),
        BandFormat::UShort => SampleBuffer::UShort(vec![value as u16; scalars]),
        BandFormat::Short => SampleBuffer::Short(vec![value as i16; scalars]),
        BandFormat::UInt => SampleBuffer::UInt(vec![value as u32; scalars]),
        BandFormat::Int => SampleBuffer::Int(vec![value as i32; scalars]),
        BandFormat::Float => SampleBuffer::Float(vec![value as f32; scalars]),
        BandFormat::Complex => SampleBuffer::Complex(vec![value as f32; scalars * 2]),
        BandFormat::Double => SampleBuffer::Double(vec![value; scalars]),
        BandFormat::DpComplex => SampleBuffer::DpComplex(vec![value; scalars * 2]),
    }
}

fn assert_all_zero(buffer: &SampleBuffer) {
    if let Some(v) = buffer.as_f32() {
        assert!(v.iter().all(|&x| x == 0.0), "non-zero f32 output: {v:?}");
    } else if let Some(v) = buffer.as_f64() {
        assert!(v.iter().all(|&x| x == 0.0), "non-zero f64 output: {v:?}");
    } else {
        panic!("unexpected output format {:?}", buffer.format());
    }
}

#[test]
fn scenario_a_u8_by_zero_is_float_zero() {
    let numerator = leaf(2, 2, 1, SampleBuffer::UChar(vec![10; 4]));
    let divisor = leaf(2, 2, 1, SampleBuffer::UChar(vec![0; 4]));
    let out = tessera::divide(&numerator, &divisor).unwrap();

    assert_eq!(out.format(), BandFormat::Float);
    assert_eq!((out.width(), out.height(), out.bands()), (2, 2, 1));
    let pixels = out.pull(Rect::sized(2, 2)).unwrap();
    assert_eq!(pixels.as_f32().unwrap(), &[0.0; 4]);
}

#[test]
fn zero_divisor_is_zero_for_all_ten_formats() {
    let expected_out = |f: BandFormat| match f {
        BandFormat::Double => BandFormat::Double,
        BandFormat::Complex => BandFormat::Complex,
        BandFormat::DpComplex => BandFormat::DpComplex,
        _ => BandFormat::Float,
    };

    for format in BandFormat::ALL {
        let numerator = leaf(3, 2, 2, filled(format, 12, 5.0));
        let divisor = leaf(3, 2, 2, filled(format, 12, 0.0));
        let out = tessera::divide(&numerator, &divisor).unwrap();
        assert_eq!(out.format(), expected_out(format), "format {format:?}");
        let pixels = out.pull(Rect::sized(3, 2)).unwrap();
        assert_all_zero(&pixels);
    }
}

#[test]
fn integer_quotients_below_one_survive_promotion() {
    let numerator = leaf(1, 1, 1, SampleBuffer::UChar(vec![1]));
    let divisor = leaf(1, 1, 1, SampleBuffer::UChar(vec![2]));
    let out = tessera::divide(&numerator, &divisor).unwrap();
    let pixels = out.pull(Rect::sized(1, 1)).unwrap();
    assert_eq!(pixels.as_f32().unwrap(), &[0.5]);
}

#[test]
fn mixed_formats_promote_through_the_common_format() {
    // UChar / Double -> common Double -> output Double.
    let numerator = leaf(1, 1, 1, SampleBuffer::UChar(vec![9]));
    let divisor = leaf(1, 1, 1, SampleBuffer::Double(vec![2.0]));
    let out = tessera::divide(&numerator, &divisor).unwrap();
    assert_eq!(out.format(), BandFormat::Double);
    let pixels = out.pull(Rect::sized(1, 1)).unwrap();
    assert_eq!(pixels.as_f64().unwrap(), &[4.5]);
}

fn complex_divide_case(divisor: (f32, f32)) -> (f32, f32) {
    let left = leaf(1, 1, 1, SampleBuffer::Complex(vec![2.0, 1.0]));
    let right = leaf(1, 1, 1, SampleBuffer::Complex(vec![divisor.0, divisor.1]));
    let out = tessera::divide(&left, &right).unwrap();
    assert_eq!(out.format(), BandFormat::Complex);
    let pixels = out.pull(Rect::sized(1, 1)).unwrap();
    let v = pixels.as_f32().unwrap();
    (v[0], v[1])
}

#[test]
fn complex_division_is_correct_in_both_pivot_branches() {
    // (2 + i) / (3 + i) = (0.7, 0.1); pivot on the real component.
    let (re, im) = complex_divide_case((3.0, 1.0));
    assert!((re - 0.7).abs() < 1e-6 && (im - 0.1).abs() < 1e-6, "{re} {im}");

    // (2 + i) / (1 + 3i) = (0.5, -0.5); pivot on the imaginary component.
    let (re, im) = complex_divide_case((1.0, 3.0));
    assert!((re - 0.5).abs() < 1e-6 && (im + 0.5).abs() < 1e-6, "{re} {im}");
}

#[test]
fn complex_zero_divisor_yields_zero_quotient() {
    let (re, im) = complex_divide_case((0.0, 0.0));
    assert_eq!((re, im), (0.0, 0.0));
}

#[test]
fn operate_builds_divide_by_name() {
    let registry = tessera::OperationRegistry::with_builtins();
    let numerator = leaf(1, 1, 1, SampleBuffer::UChar(vec![8]));
    let divisor = leaf(1, 1, 1, SampleBuffer::UChar(vec![4]));
    let outputs = registry
        .operate(
            "divide",
            &[numerator, divisor],
            &tessera::OptionList::new(),
        )
        .unwrap();
    assert_eq!(outputs.len(), 1);
    let pixels = outputs[0].pull(Rect::sized(1, 1)).unwrap();
    assert_eq!(pixels.as_f32().unwrap(), &[2.0]);
}

#[test]
fn unknown_operation_is_a_configuration_error() {
    let registry = tessera::OperationRegistry::with_builtins();
    let err = registry
        .operate("multiply", &[], &tessera::OptionList::new())
        .unwrap_err();
    assert!(matches!(err, TesseraError::Configuration(_)));
}
