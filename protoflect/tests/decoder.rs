use protoflect::{Message, decoder, decoder_of};
use protoflect_testhelpers::{eyre, setup};
use protoflect_testmodel::{FavoriteCar, FavoriteColor};

fn sample_color() -> FavoriteColor {
    FavoriteColor::new_builder()
        .set_color("red")
        .set_priority(3)
        .build()
}

#[test]
fn decodes_length_delimited() -> eyre::Result<()> {
    setup();

    let original = sample_color();
    let mut framed = Vec::new();
    original.write_length_delimited_to(&mut framed)?;

    let decoder = decoder::<FavoriteColor>()?;
    let decoded = decoder.decode_length_delimited_from(framed.as_slice())?;

    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn decodes_standalone() -> eyre::Result<()> {
    setup();

    let original = sample_color();
    let mut buf = Vec::new();
    original.write_to(&mut buf)?;

    let decoded = decoder::<FavoriteColor>()?.decode_from(buf.as_slice())?;

    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn decodes_plain_buffers() -> eyre::Result<()> {
    setup();

    let original = sample_color();
    let decoded = decoder::<FavoriteColor>()?.decode(&original.to_vec())?;

    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn roundtrips_every_message_type() -> eyre::Result<()> {
    setup();

    let car = FavoriteCar::new_builder()
        .set_make("Saab")
        .set_model("900")
        .set_year(1987)
        .build();
    let decoded = decoder_of::<FavoriteCar>(FavoriteCar::descriptor())?.decode(&car.to_vec())?;
    assert_eq!(decoded, car);

    let color = sample_color();
    let decoded = decoder_of::<FavoriteColor>(FavoriteColor::descriptor())?.decode(&color.to_vec())?;
    assert_eq!(decoded, color);
    Ok(())
}

#[test]
fn decoder_is_reusable_across_calls() -> eyre::Result<()> {
    setup();

    let decoder = decoder::<FavoriteColor>()?;
    for priority in 0..5 {
        let original = FavoriteColor::new_builder()
            .set_color("red")
            .set_priority(priority)
            .build();
        assert_eq!(decoder.decode(&original.to_vec())?, original);
    }
    Ok(())
}

#[test]
fn reads_consecutive_delimited_messages() -> eyre::Result<()> {
    setup();

    let first = sample_color();
    let second = FavoriteColor::new_builder().set_color("blue").build();

    let mut framed = Vec::new();
    first.write_length_delimited_to(&mut framed)?;
    second.write_length_delimited_to(&mut framed)?;

    let decoder = decoder::<FavoriteColor>()?;
    let mut stream = framed.as_slice();
    assert_eq!(decoder.decode_length_delimited_from(&mut stream)?, first);
    assert_eq!(decoder.decode_length_delimited_from(&mut stream)?, second);
    assert!(stream.is_empty());
    Ok(())
}
