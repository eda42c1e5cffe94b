use std::time::Duration;

use emu8_core::{Chip8, Chip8Error, Config, Fault, Instruction};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assemble(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn boot(words: &[u16]) -> Chip8 {
    init_logger();
    let mut chip8 = Chip8::with_config(Config {
        seed: Some(8),
        ..Config::default()
    });
    chip8.load_rom(&assemble(words)).unwrap();
    chip8
}

fn run(chip8: &mut Chip8, steps: usize) {
    for _ in 0..steps {
        chip8.step().unwrap();
    }
}

#[test]
fn countdown_loop_terminates() {
    let mut chip8 = boot(&[
        0x6005, // 0x200: LD V0, 5
        0x70FF, // 0x202: ADD V0, 0xFF
        0x3000, // 0x204: SE V0, 0
        0x1202, // 0x206: JP 0x202
        0x1208, // 0x208: JP 0x208
    ]);
    run(&mut chip8, 50);
    assert_eq!(chip8.state().v[0x0], 0);
    assert_eq!(chip8.state().pc, 0x208);
}

#[test]
fn subroutine_stores_bcd() {
    let mut chip8 = boot(&[
        0x63EA, // 0x200: LD V3, 234
        0xA300, // 0x202: LD I, 0x300
        0x220A, // 0x204: CALL 0x20A
        0x1206, // 0x206: JP 0x206
        0x1208, // 0x208: JP 0x208
        0xF333, // 0x20A: LD B, V3
        0x00EE, // 0x20C: RET
    ]);
    run(&mut chip8, 5);
    let state = chip8.state();
    assert_eq!(state.memory[0x300..0x303], [2, 3, 4]);
    assert_eq!(state.sp, 0);
    assert_eq!(state.pc, 0x206);
}

#[test]
fn draws_font_glyph() {
    let mut chip8 = boot(&[
        0x600A, // LD V0, 0xA
        0xF029, // LD F, V0
        0x6100, // LD V1, 0
        0x6200, // LD V2, 0
        0xD125, // DRW V1, V2, 5
    ]);
    run(&mut chip8, 5);

    let glyph = [0xF0u8, 0x90, 0xF0, 0x90, 0x90];
    let frame = chip8.get_frame().unwrap();
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8 {
            assert_eq!(frame[row][col], bits >> (7 - col) & 1 == 1, "({}, {})", col, row);
        }
    }
    assert!(frame[5].iter().all(|&p| !p));
    assert_eq!(chip8.state().v[0xF], 0);
}

#[test]
fn redrawing_erases_and_reports_collision() {
    let mut chip8 = boot(&[
        0xA300, // LD I, 0x300
        0x60FF, // LD V0, 0xFF
        0xF055, // LD [I], V0
        0x6100, // LD V1, 0
        0xD111, // DRW V1, V1, 1
        0xD111, // DRW V1, V1, 1
    ]);
    run(&mut chip8, 4);
    assert_eq!(chip8.frame_buffer()[0][..8], [true; 8]);
    run(&mut chip8, 2);
    assert!(chip8.frame_buffer().iter().flatten().all(|&p| !p));
    assert_eq!(chip8.state().v[0xF], 1);
}

#[test]
fn runaway_recursion_overflows_stack() {
    // 0x200: CALL 0x200
    let mut chip8 = boot(&[0x2200]);
    run(&mut chip8, 16);
    assert_eq!(chip8.state().sp, 16);

    let err = chip8.step().unwrap_err();
    assert!(matches!(
        err,
        Chip8Error::Fault(Fault::StackOverflow { address: 0x200 })
    ));
    assert_eq!(chip8.state().sp, 16);
    assert!(matches!(chip8.step(), Err(Chip8Error::Halted(_))));
}

#[test]
fn update_waits_for_key() {
    let mut chip8 = boot(&[
        0xF10A, // 0x200: LD V1, K
        0x1202, // 0x202: JP 0x202
    ]);
    chip8.update(Duration::from_millis(10)).unwrap();
    assert!(chip8.is_awaiting_key());
    assert_eq!(chip8.state().pc, 0x200);

    chip8.key_press(0x7);
    chip8.update(Duration::from_millis(10)).unwrap();
    assert!(!chip8.is_awaiting_key());
    assert_eq!(chip8.state().v[0x1], 0x7);
    assert_eq!(chip8.state().pc, 0x202);
}

#[test]
fn key_held_before_wait_is_ignored() {
    let mut chip8 = boot(&[0xF20A, 0x1202]);
    chip8.key_press(0x3);
    run(&mut chip8, 3);
    assert!(chip8.is_awaiting_key());

    chip8.key_release(0x3);
    run(&mut chip8, 1);
    chip8.key_press(0x3);
    run(&mut chip8, 1);
    assert_eq!(chip8.state().v[0x2], 0x3);
    assert!(!chip8.is_awaiting_key());
}

#[test]
fn sound_plays_until_timer_expires() {
    let mut chip8 = boot(&[
        0x6006, // 0x200: LD V0, 6
        0xF018, // 0x202: LD ST, V0
        0x1204, // 0x204: JP 0x204
    ]);
    run(&mut chip8, 2);
    assert!(chip8.sound_active());
    for _ in 0..5 {
        chip8.tick_timers();
    }
    assert!(chip8.sound_active());
    chip8.tick_timers();
    assert!(!chip8.sound_active());
}

#[test]
fn cosmac_quirks_from_json() {
    let config = Config::from_json(
        r#"{ "clock_speed": 1000, "seed": 1, "quirks": { "shift_uses_vy": true } }"#,
    )
    .unwrap();
    assert!(!config.quirks.load_store_increments_i);

    init_logger();
    let mut chip8 = Chip8::with_config(config);
    chip8
        .load_rom(&assemble(&[
            0x6181, // LD V1, 0x81
            0x8016, // SHR V0, V1
        ]))
        .unwrap();
    assert_eq!(chip8.update(Duration::from_millis(2)).unwrap(), 2);
    assert_eq!(chip8.state().v[0x0], 0x40);
    assert_eq!(chip8.state().v[0xF], 1);
}

#[test]
fn disassembles_rom() {
    let rom = assemble(&[0x00E0, 0xA22A, 0xD015, 0x00EE]);
    let listing: Vec<String> = rom
        .chunks(2)
        .zip((0x200u16..).step_by(2))
        .map(|(word, addr)| {
            let op = u16::from_be_bytes([word[0], word[1]]);
            Instruction::decode(op, addr).unwrap().to_string()
        })
        .collect();
    assert_eq!(listing, ["CLS", "LD I, 0x22A", "DRW V0, V1, 5", "RET"]);
}
