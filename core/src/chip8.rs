use std::collections::VecDeque;
use std::io::Read;
use std::time::Duration;

use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::Clock;
use crate::config::Config;
use crate::constants::{
    KEY_COUNT, MAX_CATCH_UP, MAX_CLOCK_SPEED, MAX_ROM_SIZE, PROGRAM_START, TIMER_SPEED,
};
use crate::error::{Chip8Error, Fault};
use crate::instruction::Instruction;
use crate::operations::execute;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - an instruction clock and a 60Hz timer clock, driven by wall-clock time
///  - the `fault` that halted execution, if any
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and reversing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    config: Config,
    rng: StdRng,
    cpu_clock: Clock,
    timer_clock: Clock,
    previous_states: VecDeque<State>,
    fault: Option<Fault>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A `clock_speed` above `MAX_CLOCK_SPEED` is lowered to it
    pub fn with_config(mut config: Config) -> Self {
        if config.clock_speed > MAX_CLOCK_SPEED {
            warn!(
                "clock_speed {} Hz lowered to {} Hz",
                config.clock_speed, MAX_CLOCK_SPEED
            );
            config.clock_speed = MAX_CLOCK_SPEED;
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::new(),
            rng,
            cpu_clock: Clock::new(config.clock_speed),
            timer_clock: Clock::new(TIMER_SPEED),
            previous_states: VecDeque::with_capacity(config.history_depth),
            fault: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the whole machine, e.g. for a debugger
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Copies a ROM into memory at 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program, at most 3584 bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// Reads at most one byte past the largest ROM, so an oversized source is
    /// rejected without being read to the end.
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom_from(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE + 1);
        reader.take(MAX_ROM_SIZE as u64 + 1).read_to_end(&mut rom)?;
        self.load_rom(&rom)
    }

    /// Returns the machine to its power-on state; the ROM has to be loaded again
    pub fn reset(&mut self) {
        self.state = State::new();
        self.cpu_clock.reset();
        self.timer_clock.reset();
        self.previous_states.clear();
        self.fault = None;
        debug!("reset");
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the hex value 0x0..=0xF of the key
    /// * `pressed` whether it is currently held down
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        match self.state.keypad.get_mut(key as usize) {
            Some(slot) => *slot = pressed,
            None => warn!("ignoring key {:#04X}, only 0x0..=0xF exist", key),
        }
    }

    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    pub fn keypad(&self) -> &[bool; KEY_COUNT] {
        &self.state.keypad
    }

    /// Whether an await-key instruction is holding up execution
    pub fn is_awaiting_key(&self) -> bool {
        self.state.key_wait.is_some()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn draw_flag(&self) -> bool {
        self.state.draw_flag
    }

    /// Called by the host once it has rendered the current frame
    pub fn clear_draw_flag(&mut self) {
        self.state.draw_flag = false;
    }

    /// A tone should play while the sound timer is running
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    /// The fault that halted the machine
    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Advances the CPU by a single cycle
    /// - refuses to run once halted
    /// - gets, decodes and executes the opcode at the pc
    /// - a fault halts the machine and leaves the state as it was before the instruction
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if let Some(fault) = self.fault {
            return Err(Chip8Error::Halted(fault));
        }

        let pc = self.state.pc;
        let op = self.state.fetch(pc);
        let snapshot = self.state;
        let result = Instruction::decode(op, pc).and_then(|instruction| {
            trace!(
                "{:04X} {:04X} {:<16} v{:02X?} i{:04X}",
                pc,
                op,
                instruction.to_string(),
                self.state.v,
                self.state.i
            );
            execute(
                instruction,
                &mut self.state,
                &self.config.quirks,
                &mut self.rng,
            )
        });

        match result {
            Ok(next) => {
                self.state.pc = next;
                self.save_state(snapshot);
                Ok(())
            }
            Err(fault) => {
                error!("halting: {}", fault);
                self.fault = Some(fault);
                Err(fault.into())
            }
        }
    }

    /// Decrements the delay and sound timers once
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Runs the machine for `elapsed` wall-clock time.
    ///
    /// Instructions run at the configured clock speed and the timers tick at
    /// 60Hz, independently of each other. Both are interleaved in the order
    /// they fell due. Returns how many instructions were executed.
    ///
    /// At most `MAX_CATCH_UP` is run per call; after a longer stall the
    /// machine resumes instead of replaying the missed time.
    pub fn update(&mut self, elapsed: Duration) -> Result<usize, Chip8Error> {
        if let Some(fault) = self.fault {
            return Err(Chip8Error::Halted(fault));
        }
        if elapsed > MAX_CATCH_UP {
            debug!("dropping {:?} of a {:?} stall", elapsed - MAX_CATCH_UP, elapsed);
        }
        let elapsed = elapsed.min(MAX_CATCH_UP);

        self.cpu_clock.advance(elapsed);
        self.timer_clock.advance(elapsed);

        let mut executed = 0;
        loop {
            match (self.cpu_clock.overdue(), self.timer_clock.overdue()) {
                (None, None) => break,
                (cpu, Some(timer)) if cpu.map_or(true, |cpu| timer >= cpu) => {
                    self.timer_clock.tick();
                    self.tick_timers();
                }
                _ => {
                    self.cpu_clock.tick();
                    self.step()?;
                    executed += 1;
                }
            }
        }
        Ok(executed)
    }

    /// Reverses the CPU by a single cycle if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - restoring clears a fault so execution can resume
    pub fn reverse_cycle(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                self.fault = None;
                debug!("rewound to {:#05X}", state.pc);
                true
            }
            None => false,
        }
    }

    /// Puts a state in previous_states
    /// - if there are already `history_depth` saved then the oldest is dropped
    fn save_state(&mut self, state: State) {
        if self.config.history_depth == 0 {
            return;
        }
        if self.previous_states.len() >= self.config.history_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(state);
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
