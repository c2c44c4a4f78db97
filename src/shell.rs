//! The interactive menu session.

use crate::render;
use core_types::normalize_symbol;
use market::{Market, PriceShock};
use portfolio::{Portfolio, PortfolioError};
use std::io::{self, BufRead, Write};
use tracing::info;

const MENU: &str = "
--- Stock Trading Platform ---
1. View Market Data
2. Buy Stock
3. Sell Stock
4. View Portfolio
5. View Performance
6. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    ViewMarket,
    Buy,
    Sell,
    ViewPortfolio,
    ViewPerformance,
    Exit,
}

impl MenuChoice {
    fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::ViewMarket),
            2 => Some(Self::Buy),
            3 => Some(Self::Sell),
            4 => Some(Self::ViewPortfolio),
            5 => Some(Self::ViewPerformance),
            6 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// One user's trading session: the market, the account, and the source of price moves.
pub struct Session<S> {
    market: Market,
    portfolio: Portfolio,
    shocks: S,
}

impl<S: PriceShock> Session<S> {
    pub fn new(market: Market, portfolio: Portfolio, shocks: S) -> Self {
        Self {
            market,
            portfolio,
            shocks,
        }
    }

    #[cfg(test)]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Runs the menu loop until the user exits or `input` is exhausted.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> io::Result<()> {
        let mut console = Console { input, output };
        info!("Session started");

        loop {
            writeln!(console.output, "{MENU}")?;
            let Some(line) = console.prompt("Choose an option: ")? else {
                break;
            };

            let Ok(number) = line.parse::<i64>() else {
                writeln!(console.output, "Invalid input. Please enter a number.")?;
                continue;
            };

            let finished = match MenuChoice::from_number(number) {
                Some(MenuChoice::ViewMarket) => self.view_market(&mut console).map(|_| false)?,
                Some(MenuChoice::Buy) => self.buy(&mut console)?,
                Some(MenuChoice::Sell) => self.sell(&mut console)?,
                Some(MenuChoice::ViewPortfolio) => self.view_portfolio(&mut console).map(|_| false)?,
                Some(MenuChoice::ViewPerformance) => {
                    self.view_performance(&mut console).map(|_| false)?
                }
                Some(MenuChoice::Exit) => true,
                None => {
                    writeln!(console.output, "Invalid option. Please try again.")?;
                    false
                }
            };
            if finished {
                break;
            }
        }

        writeln!(console.output, "Exiting...")?;
        info!("Session ended");
        Ok(())
    }

    fn view_market<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> io::Result<()> {
        self.market.refresh_prices(&mut self.shocks);
        writeln!(console.output, "Market Data:")?;
        writeln!(console.output, "{}", render::market_table(&self.market))
    }

    /// Returns `true` when input ran out mid-dialog.
    fn buy<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> io::Result<bool> {
        let Some(symbol) = console.prompt("Enter stock symbol to buy: ")? else {
            return Ok(true);
        };
        let symbol = normalize_symbol(&symbol);
        if !self.market.contains(&symbol) {
            writeln!(console.output, "Invalid stock symbol.")?;
            return Ok(false);
        }

        let Some(quantity) = console.prompt_positive("Enter quantity to buy: ")? else {
            return Ok(true);
        };
        let result = self.portfolio.buy_at_market(&self.market, &symbol, quantity);
        Self::report_trade(console, result)?;
        Ok(false)
    }

    /// Returns `true` when input ran out mid-dialog.
    fn sell<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> io::Result<bool> {
        let Some(symbol) = console.prompt("Enter stock symbol to sell: ")? else {
            return Ok(true);
        };
        let symbol = normalize_symbol(&symbol);
        if !self.portfolio.holds(&symbol) {
            writeln!(console.output, "You do not own any shares of {symbol}")?;
            return Ok(false);
        }

        let Some(quantity) = console.prompt_positive("Enter quantity to sell: ")? else {
            return Ok(true);
        };
        let result = self.portfolio.sell_at_market(&self.market, &symbol, quantity);
        Self::report_trade(console, result)?;
        Ok(false)
    }

    fn report_trade<R, W: Write>(
        console: &mut Console<R, W>,
        result: Result<portfolio::TradeConfirmation, PortfolioError>,
    ) -> io::Result<()> {
        match result {
            Ok(fill) => writeln!(console.output, "{fill}"),
            Err(e) => writeln!(console.output, "{e}"),
        }
    }

    fn view_portfolio<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> io::Result<()> {
        let valuation = match self.portfolio.valuation(&self.market) {
            Ok(valuation) => valuation,
            Err(e) => return writeln!(console.output, "{e}"),
        };
        writeln!(console.output, "Current Portfolio:")?;
        writeln!(console.output, "{}", render::valuation_table(&valuation))?;
        writeln!(console.output, "Account Balance: {}", render::money(valuation.cash))?;
        writeln!(
            console.output,
            "Total Portfolio Value: {}",
            render::money(valuation.total_value)
        )
    }

    fn view_performance<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> io::Result<()> {
        writeln!(console.output, "Performance History:")?;
        match self.portfolio.performance_report() {
            Ok(report) => {
                writeln!(console.output, "{}", render::performance_table(&report))?;
                for line in render::performance_summary(&report) {
                    writeln!(console.output, "{line}")?;
                }
                Ok(())
            }
            Err(e) => writeln!(console.output, "{e}"),
        }
    }
}

/// Line-oriented prompt/answer plumbing over any reader and writer.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Prints `message` and reads one trimmed line. `None` means end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Keeps asking until a positive whole number is entered. `None` means end of input.
    fn prompt_positive(&mut self, message: &str) -> io::Result<Option<i64>> {
        let mut message = message;
        loop {
            let Some(line) = self.prompt(message)? else {
                return Ok(None);
            };
            match line.parse::<i64>() {
                Ok(value) if value > 0 => return Ok(Some(value)),
                Ok(_) => message = "Please enter a positive number: ",
                Err(_) => message = "Invalid input. Please enter a number: ",
            }
        }
    }
}
