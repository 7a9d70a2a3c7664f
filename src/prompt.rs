//! Interactive collection of loan terms.
//!
//! Every reader keeps asking until it gets a usable answer; running out of
//! input is the only way to stop it early.

use log::trace;
use std::io::{self, BufRead, Write};

use crate::loan::RepaymentFrequency;

/// Writes `prompt` and reads one line; `None` at end of input.
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    trace!("read {:?} for {:?}", line.trim_end(), prompt);
    Ok(Some(line.trim().to_string()))
}

fn require_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<String> {
    read_line(input, output, prompt)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("input ended before an answer to {:?}", prompt.trim()),
        )
    })
}

pub fn ask_positive_f64<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    name: &str,
) -> io::Result<f64> {
    loop {
        let line = require_line(input, output, prompt)?;
        match line.parse::<f64>() {
            Ok(value) if !value.is_finite() => {
                writeln!(output, "Not a valid float value. Try again...")?
            }
            Ok(value) if value <= 0. => writeln!(
                output,
                "Value of \"{}\" should be positive. Try again...",
                name
            )?,
            Ok(value) => return Ok(value),
            Err(_) => writeln!(output, "Not a valid float value. Try again...")?,
        }
    }
}

pub fn ask_positive_u32<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    name: &str,
) -> io::Result<u32> {
    loop {
        let line = require_line(input, output, prompt)?;
        match line.parse::<i64>() {
            Ok(value) if value <= 0 => writeln!(
                output,
                "Value of \"{}\" should be positive. Try again...",
                name
            )?,
            Ok(value) => match u32::try_from(value) {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(output, "Not a valid int value. Try again...")?,
            },
            Err(_) => writeln!(output, "Not a valid int value. Try again...")?,
        }
    }
}

pub fn ask_repayment_interval<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<RepaymentFrequency> {
    loop {
        let line = require_line(
            input,
            output,
            "Enter the repayment frequency in days (7, 14 or 30): ",
        )?;
        match line.parse::<u32>() {
            Ok(days) => match RepaymentFrequency::from_days(days) {
                Some(frequency) => return Ok(frequency),
                None => writeln!(
                    output,
                    "Value of frequency should be 7, 14 or 30. Try again..."
                )?,
            },
            Err(_) => writeln!(output, "Not a valid int value. Try again...")?,
        }
    }
}

/// `true` only for a `y` answer.
pub fn ask_confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<bool> {
    Ok(read_line(input, output, prompt)?.as_deref() == Some("y"))
}

#[cfg(test)]
mod tests {
    use super::{ask_confirm, ask_positive_f64, ask_positive_u32, ask_repayment_interval};
    use crate::loan::RepaymentFrequency;
    use std::io::{Cursor, ErrorKind};
    use test_log::test;

    fn transcript(output: Vec<u8>) -> String {
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_ask_positive_f64() {
        let mut input = Cursor::new("abc\n-5\n0\n300000.5\n");
        let mut output = Vec::<u8>::new();
        let value = ask_positive_f64(&mut input, &mut output, "Loan: ", "loan").unwrap();

        assert_eq!(value, 300000.5);
        assert_eq!(
            transcript(output),
            "Loan: Not a valid float value. Try again...\n\
             Loan: Value of \"loan\" should be positive. Try again...\n\
             Loan: Value of \"loan\" should be positive. Try again...\n\
             Loan: "
        );
    }

    #[test]
    fn test_ask_positive_f64_rejects_nan() {
        let mut input = Cursor::new("NaN\n 5.5 \n");
        let mut output = Vec::<u8>::new();
        let value = ask_positive_f64(&mut input, &mut output, "Rate: ", "interest").unwrap();

        assert_eq!(value, 5.5);
        assert!(transcript(output).contains("Not a valid float value"));
    }

    #[test]
    fn test_ask_positive_u32() {
        let mut input = Cursor::new("2.5\n-3\n99999999999\n30\n");
        let mut output = Vec::<u8>::new();
        let value = ask_positive_u32(&mut input, &mut output, "Years: ", "year").unwrap();

        assert_eq!(value, 30);
        let transcript = transcript(output);
        assert_eq!(transcript.matches("Not a valid int value").count(), 2);
        assert_eq!(
            transcript
                .matches("Value of \"year\" should be positive")
                .count(),
            1
        );
    }

    #[test]
    fn test_ask_repayment_interval() {
        let mut input = Cursor::new("weekly\n10\n14\n");
        let mut output = Vec::<u8>::new();
        let frequency = ask_repayment_interval(&mut input, &mut output).unwrap();

        assert_eq!(frequency, RepaymentFrequency::Fortnightly);
        let transcript = transcript(output);
        assert!(transcript.contains("Not a valid int value. Try again..."));
        assert!(transcript.contains("Value of frequency should be 7, 14 or 30. Try again..."));
    }

    #[test]
    fn test_end_of_input() {
        let mut input = Cursor::new("-1\n");
        let mut output = Vec::<u8>::new();
        let err = ask_positive_f64(&mut input, &mut output, "Loan: ", "loan").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

        let mut input = Cursor::new("");
        let err = ask_repayment_interval(&mut input, &mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_ask_confirm() {
        let ask = |answer: &'static str| {
            ask_confirm(&mut Cursor::new(answer), &mut Vec::<u8>::new(), "Plot? ").unwrap()
        };
        assert!(ask("y\n"));
        assert!(ask(" y \n"));
        assert!(!ask("n\n"));
        assert!(!ask("yes\n"));
        assert!(!ask(""));
    }
}
