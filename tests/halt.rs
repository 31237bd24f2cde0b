use std::path::PathBuf;

use ls8::{
    config::Config,
    emulator::{Emulator, TestIo},
    error::{ExecutionError, LoadError},
    image::read_program,
};

fn program_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join(name)
}

#[test]
fn test_halt_emulate_program() {
    let image = read_program(program_path("halt.ls8")).unwrap();
    assert_eq!(image, vec![0b00000001]);

    let mut e = Emulator::from_image(&image, TestIo::new()).unwrap();
    e.run().unwrap();

    assert!(e.halted);
    assert_eq!(e.pc, 1);
    assert_eq!(e.cycles, 1);
    assert!(e.io.output().is_empty());
}

#[test]
fn test_read_assembly_program() {
    let image = read_program(program_path("stack.asm")).unwrap();

    let mut e = Emulator::from_image(&image, TestIo::new()).unwrap();
    e.run().unwrap();

    assert_eq!(e.io.output(), &[3, 2, 1]);
}

#[test]
fn test_missing_program_file() {
    let err = read_program(program_path("missing.ls8")).unwrap_err();

    match err {
        LoadError::ProgramFileNotFound { ref path } => assert!(path.ends_with("missing.ls8")),
        ref other => panic!("unexpected error {:?}", other),
    }

    assert!(err.to_string().ends_with("missing.ls8: file was not found"));
}

#[test]
fn test_program_without_halt() {
    // LDI R0,1 followed by empty memory never halts.
    let mut e = Emulator::from_image(&[0b10000010, 0, 1], TestIo::new()).unwrap();
    assert_eq!(e.run(), Err(ExecutionError::InvalidAddress { address: 256 }));

    let mut e = Emulator::from_image(&[0b10000010, 0, 1], TestIo::new())
        .unwrap()
        .with_config(Config::strict());
    assert_eq!(e.run(), Err(ExecutionError::UnknownOpcode { opcode: 0, address: 3 }));
}
