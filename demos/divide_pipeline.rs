use tessera::{BandFormat, DemandStyle, Image, ImageHeader, Rect, SampleBuffer, divide};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // A u8 gradient divided by a flat-field image; the quotient promotes to
    // f32 so fractional values survive.
    let header = ImageHeader::new(64, 64, 1, BandFormat::UChar, DemandStyle::Any)?;
    let gradient = Image::from_buffer(
        header,
        SampleBuffer::UChar((0..64 * 64).map(|i| (i % 256) as u8).collect()),
    )?;
    let flat = Image::from_buffer(header, SampleBuffer::UChar(vec![2; 64 * 64]))?;

    let quotient = divide(&gradient, &flat)?.cached();
    println!("output header: {:?}", quotient.header());

    for rect in [Rect::new(0, 0, 16, 16), Rect::new(32, 32, 16, 16)] {
        let tile = quotient.pull(rect)?;
        let sum: f32 = tile.as_f32().unwrap().iter().sum();
        println!("{rect:?}: {} scalars, sum {sum}", tile.len());
    }

    Ok(())
}
