use ls8::{
    image::parse_image,
    emulator::{Emulator, TestIo},
    memory::Ram,
};

fn read_program() -> Vec<u8> {
    let image_file = include_str!("mult.ls8");

    parse_image(image_file).unwrap()
}

#[test]
fn test_mult_read_program() {
    let image = read_program();

    assert_eq!(image, vec![
        0b10000010, 0, 8,
        0b10000010, 1, 9,
        0b10100010, 0, 1,
        0b01000111, 0,
        0b00000001,
    ]);
}

#[test]
fn test_mult_emulate_program() {
    let image = read_program();

    let mut io = TestIo::new();

    let mut e = Emulator::new(Ram::from_image(&image).unwrap(), &mut io);

    while !e.halted {
        println!("{}", e.snapshot());
        e.step().unwrap();
    }

    assert_eq!(e.pc, image.len());
    assert_eq!(e.registers.get(0), Ok(72));
    assert_eq!(e.registers.get(1), Ok(9));

    drop(e);
    assert_eq!(io.into_output(), [72]);
}

#[test]
fn test_print8_emulate_program() {
    let image = parse_image(include_str!("print8.ls8")).unwrap();

    let mut e = Emulator::from_image(&image, TestIo::new()).unwrap();
    e.run().unwrap();

    assert_eq!(e.io.output(), &[8]);
}
