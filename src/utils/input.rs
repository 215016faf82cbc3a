use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};

use crate::index::TemperatureUnit;

/// Prompts on stdout until `parse` accepts a line from `input`.
pub fn prompt_until<R, T>(
    input: &mut R,
    prompt: &str,
    mut parse: impl FnMut(&str) -> Result<T, String>,
) -> Result<T>
where
    R: BufRead,
{
    loop {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for '{}'", prompt.trim());
        }

        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(msg) => println!("{}", msg),
        }
    }
}

pub fn get_input<R: BufRead>(input: &mut R, prompt: &str) -> Result<f64> {
    prompt_until(input, prompt, |s| check_number(parse_number(s)?))
}

/// Like [`get_input`] but refuses negative readings.
pub fn get_concentration<R: BufRead>(input: &mut R, prompt: &str) -> Result<f64> {
    prompt_until(input, prompt, |s| check_concentration(parse_number(s)?))
}

pub fn get_unit<R: BufRead>(input: &mut R) -> Result<TemperatureUnit> {
    prompt_until(input, "Temperature unit [c/f/k]: ", |s| {
        if s.is_empty() {
            return Ok(TemperatureUnit::Celsius);
        }
        s.parse::<TemperatureUnit>().map_err(|e| e.to_string())
    })
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse::<f64>().map_err(|_| "Please enter a valid number".to_string())
}

/// Accepts any finite number.
pub fn check_number(value: f64) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err("Please enter a valid number".to_string())
    }
}

/// Accepts finite numbers of 0 or more.
pub fn check_concentration(value: f64) -> Result<f64, String> {
    let value = check_number(value)?;
    if value < 0.0 {
        Err("Please enter a value of 0 or more".to_string())
    } else {
        Ok(value)
    }
}
