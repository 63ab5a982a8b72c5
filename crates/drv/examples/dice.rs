//! Dice and coins: finite random variables end to end
//!
//! Run with: RUST_LOG=debug cargo run -p drv --example dice
//!
//! This example demonstrates:
//! - Building variables from raw weights (normalized automatically)
//! - pmf, cdf, ppf, mode and support queries
//! - Pushforward through a function (`map`), with and without flattening
//! - Combining independent variables (`binop`)
//!
//! Key insight: the cdf follows the order the categories were given in.

use drv::{DrvError, FiniteVariable};

fn main() -> Result<(), DrvError> {
    env_logger::init();

    println!("=== Finite Discrete Random Variables ===\n");

    // -------------------------------------------------------------------------
    // 1. A fair die
    // -------------------------------------------------------------------------
    println!("1. A fair die");
    println!("-------------");

    let d6 = FiniteVariable::uniform("d6", vec![1, 2, 3, 4, 5, 6])?;
    println!("{}: {:?}", d6, d6.weights());
    println!("  pmf(3)   = {:.4}", d6.pmf(&3));
    println!("  cdf(3)   = {:.4}", d6.cdf(&3)?);
    println!("  ppf(0.5) = {}", d6.ppf(0.5)?);
    println!("  pmf(7)   = {} (not a face, so zero)", d6.pmf(&7));
    println!();

    // -------------------------------------------------------------------------
    // 2. A biased coin
    // -------------------------------------------------------------------------
    println!("2. A biased coin");
    println!("----------------");

    let coin = FiniteVariable::new("coin", vec!["H", "T"], vec![9.0, 1.0])?;
    println!("{}: {:?}", coin, coin.weights());
    println!("  mode      = {}", coin.mode());
    println!("  cdf(H)    = {:.4}", coin.cdf(&"H")?);
    println!("  ppf(0.95) = {}", coin.ppf(0.95)?);
    println!("  logpmf(T) = {:.4}", coin.logpmf(&"T"));
    match coin.cdf(&"edge") {
        Ok(c) => println!("  cdf(edge) = {c}"),
        Err(e) => println!("  cdf(edge) fails: {e}"),
    }
    println!();

    // -------------------------------------------------------------------------
    // 3. Pushforward
    // -------------------------------------------------------------------------
    println!("3. Pushforward");
    println!("--------------");

    let halves = d6.map(|x| x / 2, "d6/2", true)?;
    for (x, p) in halves.items() {
        println!("  P({} = {}) = {:.4}", halves, x, p);
    }
    if let Err(e) = d6.map(|x| x / 2, "d6/2", false) {
        println!("  without flatten: {e}");
    }
    println!();

    // -------------------------------------------------------------------------
    // 4. Two dice
    // -------------------------------------------------------------------------
    println!("4. Two dice");
    println!("-----------");

    let total = d6.binop(&d6, |a, b| a + b, "2d6")?;
    for (x, p) in total.items() {
        println!("  P({:>2}) = {:.4} {}", x, p, "#".repeat((p * 100.0) as usize));
    }
    println!("  mode = {}, median = {}", total.mode(), total.ppf(0.5)?);

    Ok(())
}
