use colored::Colorize;
use rt_dice::{DiceExpr, DiceRoller};
use rt_tables::TableResult;

pub fn run(expr: &str, times: u32, seed: Option<u64>) -> TableResult<()> {
    let expr = DiceExpr::parse(expr)?;
    let mut roller = DiceRoller::new(seed);

    println!(
        "  {} {}",
        expr.to_string().bold(),
        format!("(range {} to {})", expr.min(), expr.max()).dimmed()
    );
    for _ in 0..times {
        let value = roller.roll_expr(&expr);
        let shown = value.to_string();
        let shown = if value == expr.max() {
            shown.green().bold()
        } else if value == expr.min() {
            shown.red()
        } else {
            shown.normal()
        };
        println!("  {shown}");
    }

    Ok(())
}
