//! Console rendering of query results.

use crate::protocol::{Gram, QueryResponse};
use std::io::{self, Write};

/// Format a frequency in [0, 1] as a percentage with three decimals.
pub fn percent(frequency: f64) -> String {
    format!("{}%", fixed3(frequency * 100.0))
}

/// Three decimals, with exact ties rounded away from zero.
///
/// `{:.3}` rounds exact ties to even. A value can only sit exactly halfway
/// between two thousandths when it is an odd multiple of 1/16.
fn fixed3(value: f64) -> String {
    let sixteenths = value * 16.0;
    if sixteenths.fract() == 0.0 && sixteenths % 2.0 != 0.0 {
        format!("{:.3}", (value * 1000.0).round() / 1000.0)
    } else {
        format!("{:.3}", value)
    }
}

/// Lazily format each gram as `"<gram> <percent>"`, in the order given.
pub fn lines(grams: &[Gram]) -> impl Iterator<Item = String> + '_ {
    grams
        .iter()
        .map(|gram| format!("{} {}", gram.text(), percent(gram.frequency())))
}

/// Write a response to `out`: one line per gram, or the raw failure body.
pub fn write_response<W: Write>(response: &QueryResponse, out: W) -> io::Result<()> {
    match response {
        QueryResponse::Grams(grams) => write_lines(grams, out),
        QueryResponse::Failure { body, .. } => write_raw(body, out),
    }
}

fn write_lines<W: Write>(grams: &[Gram], mut out: W) -> io::Result<()> {
    for line in lines(grams) {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Write a body byte-for-byte, terminated by a newline unless it already ends in one.
pub fn write_raw<W: Write>(body: &[u8], mut out: W) -> io::Result<()> {
    out.write_all(body)?;
    if !body.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()
}
