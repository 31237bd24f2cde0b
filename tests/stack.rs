use ls8::{
    asm,
    image::parse_image,
    emulator::{Emulator, TestIo},
    registers::STACK_BASE_ADDRESS,
};

use slog::{Logger, Drain, o};
use slog_term::{TermDecorator, FullFormat};

#[test]
fn test_stack_emulate_program() {
    let image = parse_image(include_str!("stack.ls8")).unwrap();

    let mut e = Emulator::from_image(&image, TestIo::new()).unwrap();
    e.run().unwrap();

    assert_eq!(e.io.output(), &[5]);
    assert_eq!(e.registers.get(2), Ok(0));
    assert_eq!(e.registers.get(3), Ok(5));
    assert_eq!(e.registers.sp(), STACK_BASE_ADDRESS);
}

#[test]
fn test_stack_assembled_program() {
    let image = asm::assemble(include_str!("stack.asm"))
        .expect("could not assemble stack.asm");

    let decorator = TermDecorator::new().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let logger = Logger::root(drain, o!());

    let mut io = TestIo::new();
    let mut e = Emulator::with_logger(
        ls8::memory::Ram::from_image(&image).unwrap(),
        &mut io,
        logger,
    );

    while !e.halted {
        println!("{:?}", e.get_current_instruction());
        e.step().unwrap();
    }

    assert_eq!(e.registers.sp(), STACK_BASE_ADDRESS);

    drop(e);
    assert_eq!(io.into_output(), [3, 2, 1]);
}

#[test]
fn test_stack_disassemble_round_trip() {
    let image = parse_image(include_str!("stack.ls8")).unwrap();
    let source = asm::disassemble(&image);

    assert_eq!(source, "LDI R2, 5\nPUSH R2\nLDI R2, 0\nPOP R3\nPRN R3\nHLT\n");
    assert_eq!(asm::assemble(&source).unwrap(), image);
}
