use log::debug;
use rand::Rng;

use crate::config::Quirks;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::state::{KeyWait, State};

/// Applies a decoded instruction to the state.
///
/// `state.pc` must be the address the instruction was fetched from.
/// Returns the address of the next instruction to fetch; the caller stores it.
/// A fault is returned before anything has been modified.
pub fn execute<R: Rng + ?Sized>(
    instruction: Instruction,
    state: &mut State,
    quirks: &Quirks,
    rng: &mut R,
) -> Result<u16, Fault> {
    use Instruction::*;

    let pc = match instruction {
        Sys { .. } => next(state),
        Cls => clr(state),
        Ret => rts(state)?,
        Jump { addr } => addr,
        Call { addr } => call(state, addr)?,
        SkipEqByte { x, kk } => skip_if(state, state.v[x as usize] == kk),
        SkipNeByte { x, kk } => skip_if(state, state.v[x as usize] != kk),
        SkipEqReg { x, y } => skip_if(state, state.v[x as usize] == state.v[y as usize]),
        SkipNeReg { x, y } => skip_if(state, state.v[x as usize] != state.v[y as usize]),
        LoadByte { x, kk } => load(state, x, kk),
        AddByte { x, kk } => add(state, x, kk),
        Move { x, y } => mv(state, x, y),
        Or { x, y } => or(state, x, y),
        And { x, y } => and(state, x, y),
        Xor { x, y } => xor(state, x, y),
        AddReg { x, y } => addr(state, x, y),
        Sub { x, y } => sub(state, x, y),
        ShiftRight { x, y } => shr(state, x, y, quirks.shift_uses_vy),
        SubN { x, y } => subn(state, x, y),
        ShiftLeft { x, y } => shl(state, x, y, quirks.shift_uses_vy),
        LoadIndex { addr } => loadi(state, addr),
        JumpOffset { addr } => u16::from(state.v[0x0]).wrapping_add(addr),
        Random { x, kk } => rnd(state, x, kk, rng),
        Draw { x, y, n } => draw(state, x, y, n, quirks.wrap_sprites),
        SkipKeyPressed { x } => skip_if(state, state.is_key_pressed(state.v[x as usize])),
        SkipKeyReleased { x } => skip_if(state, !state.is_key_pressed(state.v[x as usize])),
        LoadDelay { x } => moved(state, x),
        AwaitKey { x } => keyd(state, x),
        SetDelay { x } => loads(state, x),
        SetSound { x } => ld(state, x),
        AddIndex { x } => addi(state, x),
        LoadDigit { x } => ldspr(state, x),
        StoreBcd { x } => bcd(state, x),
        StoreRegisters { x } => stor(state, x, quirks.load_store_increments_i),
        LoadRegisters { x } => read(state, x, quirks.load_store_increments_i),
    };
    Ok(pc)
}

fn next(state: &State) -> u16 {
    state.pc.wrapping_add(0x2)
}

fn skip_if(state: &State, condition: bool) -> u16 {
    if condition {
        state.pc.wrapping_add(0x4)
    } else {
        next(state)
    }
}

/// clear
fn clr(state: &mut State) -> u16 {
    state.clear_screen();
    next(state)
}

/// PC = STACK.pop() + 2
/// The stack holds the address of the call, so resume on the instruction after it
fn rts(state: &mut State) -> Result<u16, Fault> {
    let call_site = state.pop()?;
    Ok(call_site.wrapping_add(0x2))
}

/// STACK.push(PC); PC = addr
fn call(state: &mut State, addr: u16) -> Result<u16, Fault> {
    state.push(state.pc)?;
    Ok(addr)
}

/// Vx = kk
fn load(state: &mut State, x: u8, kk: u8) -> u16 {
    state.v[x as usize] = kk;
    next(state)
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
fn add(state: &mut State, x: u8, kk: u8) -> u16 {
    state.v[x as usize] = state.v[x as usize].wrapping_add(kk);
    next(state)
}

/// Vx = Vy
fn mv(state: &mut State, x: u8, y: u8) -> u16 {
    state.v[x as usize] = state.v[y as usize];
    next(state)
}

/// Vx |= Vy
fn or(state: &mut State, x: u8, y: u8) -> u16 {
    state.v[x as usize] |= state.v[y as usize];
    next(state)
}

/// Vx &= Vy
fn and(state: &mut State, x: u8, y: u8) -> u16 {
    state.v[x as usize] &= state.v[y as usize];
    next(state)
}

/// Vx ^= Vy
fn xor(state: &mut State, x: u8, y: u8) -> u16 {
    state.v[x as usize] ^= state.v[y as usize];
    next(state)
}

/// Vx += Vy; VF = overflow
fn addr(state: &mut State, x: u8, y: u8) -> u16 {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    state.v[x as usize] = res;
    state.v[0xF] = u8::from(over);
    next(state)
}

/// Vx -= Vy; VF = !borrow
fn sub(state: &mut State, x: u8, y: u8) -> u16 {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    state.v[x as usize] = vx.wrapping_sub(vy);
    state.v[0xF] = u8::from(vx >= vy);
    next(state)
}

/// Vx = Vy - Vx; VF = Vy > Vx
fn subn(state: &mut State, x: u8, y: u8) -> u16 {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    state.v[x as usize] = vy.wrapping_sub(vx);
    state.v[0xF] = u8::from(vy > vx);
    next(state)
}

/// Vx >>= 1; VF = shifted out bit
fn shr(state: &mut State, x: u8, y: u8, shift_uses_vy: bool) -> u16 {
    let value = if shift_uses_vy {
        state.v[y as usize]
    } else {
        state.v[x as usize]
    };
    state.v[x as usize] = value >> 1;
    state.v[0xF] = value & 0x1;
    next(state)
}

/// Vx <<= 1; VF = shifted out bit
fn shl(state: &mut State, x: u8, y: u8, shift_uses_vy: bool) -> u16 {
    let value = if shift_uses_vy {
        state.v[y as usize]
    } else {
        state.v[x as usize]
    };
    state.v[x as usize] = value << 1;
    state.v[0xF] = value >> 7;
    next(state)
}

/// I = addr
fn loadi(state: &mut State, addr: u16) -> u16 {
    state.i = addr;
    next(state)
}

/// Vx = rand_byte & kk
fn rnd<R: Rng + ?Sized>(state: &mut State, x: u8, kk: u8, rng: &mut R) -> u16 {
    let rand_byte: u8 = rng.gen();
    state.v[x as usize] = rand_byte & kk;
    next(state)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n onto the FrameBuffer at Vx, Vy.
/// The origin always wraps onto the screen; the rest of the sprite is clipped
/// at the edges unless `wrap` is set.
/// Sets VF if any pixels were erased
fn draw(state: &mut State, x: u8, y: u8, n: u8, wrap: bool) -> u16 {
    let origin_x = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[y as usize] as usize % DISPLAY_HEIGHT;
    let mut collision = false;

    for row in 0..n as usize {
        let mut py = origin_y + row;
        if py >= DISPLAY_HEIGHT {
            if !wrap {
                break;
            }
            py %= DISPLAY_HEIGHT;
        }
        let sprite = state.read(state.i.wrapping_add(row as u16));
        for bit in 0..8 {
            let mut px = origin_x + bit;
            if px >= DISPLAY_WIDTH {
                if !wrap {
                    break;
                }
                px %= DISPLAY_WIDTH;
            }
            if sprite >> (7 - bit) & 0x1 == 0x1 {
                let pixel = &mut state.frame_buffer[py][px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
    }

    state.v[0xF] = u8::from(collision);
    state.draw_flag = true;
    next(state)
}

/// Vx = DT
fn moved(state: &mut State, x: u8) -> u16 {
    state.v[x as usize] = state.delay_timer;
    next(state)
}

/// await keypress for Vx
/// Re-executes until a key goes down after a moment with none held
fn keyd(state: &mut State, x: u8) -> u16 {
    let armed = match state.key_wait {
        Some(wait) if wait.register == x => wait.armed,
        _ => {
            debug!("waiting for a key press into V{:X}", x);
            false
        }
    };

    match (armed, state.first_pressed_key()) {
        (true, Some(key)) => {
            debug!("latched key {:X} into V{:X}", key, x);
            state.v[x as usize] = key;
            state.key_wait = None;
            next(state)
        }
        (_, None) => {
            state.key_wait = Some(KeyWait { register: x, armed: true });
            state.pc
        }
        (false, Some(_)) => {
            state.key_wait = Some(KeyWait { register: x, armed: false });
            state.pc
        }
    }
}

/// DT = Vx
fn loads(state: &mut State, x: u8) -> u16 {
    state.delay_timer = state.v[x as usize];
    next(state)
}

/// ST = Vx
fn ld(state: &mut State, x: u8) -> u16 {
    state.sound_timer = state.v[x as usize];
    next(state)
}

/// I += Vx
/// I may temporarily exceed 12 bits; it's masked whenever it addresses memory
fn addi(state: &mut State, x: u8) -> u16 {
    state.i = state.i.wrapping_add(u16::from(state.v[x as usize]));
    next(state)
}

/// I = address of the sprite for the digit in Vx
/// See constants::SPRITE_SHEET for more details
fn ldspr(state: &mut State, x: u8) -> u16 {
    state.i = State::font_address(state.v[x as usize]);
    next(state)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
fn bcd(state: &mut State, x: u8) -> u16 {
    let value = state.v[x as usize];
    let digits = [value / 100 % 10, value / 10 % 10, value % 10];
    for (offset, digit) in digits.iter().enumerate() {
        state.write(state.i.wrapping_add(offset as u16), *digit);
    }
    next(state)
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &mut State, x: u8, increment_i: bool) -> u16 {
    for k in 0..=x {
        state.write(state.i.wrapping_add(u16::from(k)), state.v[k as usize]);
    }
    if increment_i {
        state.i = state.i.wrapping_add(u16::from(x) + 1);
    }
    next(state)
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &mut State, x: u8, increment_i: bool) -> u16 {
    for k in 0..=x {
        state.v[k as usize] = state.read(state.i.wrapping_add(u16::from(k)));
    }
    if increment_i {
        state.i = state.i.wrapping_add(u16::from(x) + 1);
    }
    next(state)
}
