//! Arithmetic in GF(2^8) using logarithm and exponential tables.
//!
//! The tables are computed at compile time for the irreducible polynomial
//! `FIELD_POLYNOMIAL` and the primitive element `FIELD_GENERATOR`, so they
//! are immutable for the life of the process and can be read from any
//! thread without synchronisation.

use crate::{
    ShamirError,
    constants::{FIELD_GENERATOR, FIELD_POLYNOMIAL},
};

/// The multiplicative group of GF(2^8) has 255 elements.
const GROUP_ORDER: usize = 255;

/// Logarithm and exponential tables for GF(2^8).
///
/// For every nonzero `a`, `exp(log(a)) == a`. Zero has no logarithm.
pub struct Tables {
    log: [u8; 256],
    exp: [u8; GROUP_ORDER],
}

/// The process-wide tables.
pub static TABLES: Tables = Tables::new();

/// Shift-and-add multiplication, only used to build the tables.
const fn mul_without_tables(a: u8, b: u8) -> u8 {
    let mut a = a as u16;
    let mut b = b;
    let mut r: u16 = 0;
    while b != 0 {
        if b & 1 != 0 {
            r ^= a;
        }
        a <<= 1;
        if a & 0x100 != 0 {
            a ^= FIELD_POLYNOMIAL;
        }
        b >>= 1;
    }
    r as u8
}

impl Tables {
    const fn new() -> Self {
        let mut log = [0u8; 256];
        let mut exp = [0u8; GROUP_ORDER];
        let mut x: u8 = 1;
        let mut i = 0;
        while i < GROUP_ORDER {
            exp[i] = x;
            log[x as usize] = i as u8;
            x = mul_without_tables(x, FIELD_GENERATOR);
            i += 1;
        }
        Self { log, exp }
    }

    /// The discrete logarithm of `a` relative to the generator, or `None`
    /// for zero.
    pub fn log(&self, a: u8) -> Option<u8> {
        if a == 0 {
            None
        } else {
            Some(self.log[a as usize])
        }
    }

    /// The generator raised to the power `i` (taken modulo 255).
    pub fn exp(&self, i: usize) -> u8 {
        self.exp[i % GROUP_ORDER]
    }
}

/// Add (XOR) two field elements. Subtraction is the same operation.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiply two field elements.
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_a = TABLES.log[a as usize] as usize;
    let log_b = TABLES.log[b as usize] as usize;
    TABLES.exp[(log_a + log_b) % GROUP_ORDER]
}

/// Divide `a` by `b`. Fails when `b` is zero.
pub fn div(a: u8, b: u8) -> Result<u8, ShamirError> {
    if b == 0 {
        return Err(ShamirError::DivideByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let log_a = TABLES.log[a as usize] as usize;
    let log_b = TABLES.log[b as usize] as usize;
    Ok(TABLES.exp[(log_a + GROUP_ORDER - log_b) % GROUP_ORDER])
}
