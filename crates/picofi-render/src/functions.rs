//! Calculator capabilities callable from templates.
//!
//! Templates name a capability (`{{ annualSaveRate annual-income annual-expenses }}`)
//! and the compiler resolves the name against a [`FunctionTable`] once.
//! Unknown names fail compilation instead of failing on every render.

use std::fmt;

use picofi_core::{Calculator, Money};

/// A named calculation a template may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Annual savings as a formatted amount, e.g. `€20,000.00`.
    AnnualSaveRate,
    /// Annual savings as a share of income, e.g. `28.57%`.
    AnnualSaveRatePercent,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::AnnualSaveRate, Capability::AnnualSaveRatePercent];

    /// Name used in markup.
    pub const fn name(&self) -> &'static str {
        match self {
            Capability::AnnualSaveRate => "annualSaveRate",
            Capability::AnnualSaveRatePercent => "annualSaveRatePercent",
        }
    }

    /// Number of money arguments: income and expenses.
    pub const fn arity(&self) -> usize {
        2
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The capabilities a template is compiled against, plus the calculator
/// that backs them.
///
/// The table is bound at compile time and is not part of the cache key:
/// rendering with a different table requires `force_refresh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTable {
    calculator: Calculator,
    capabilities: Vec<Capability>,
}

impl FunctionTable {
    /// Table exposing every capability.
    pub fn new(calculator: Calculator) -> Self {
        FunctionTable {
            calculator,
            capabilities: Capability::ALL.to_vec(),
        }
    }

    /// Table exposing nothing; templates with function calls will not compile.
    pub fn empty(calculator: Calculator) -> Self {
        FunctionTable {
            calculator,
            capabilities: Vec::new(),
        }
    }

    /// Adds a capability.
    pub fn with(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Looks up a capability by its markup name.
    pub fn resolve(&self, name: &str) -> Option<Capability> {
        self.capabilities.iter().copied().find(|c| c.name() == name)
    }

    /// Runs a capability.
    ///
    /// Calculation failures come back as an inline `error: ...` string so a
    /// page with odd figures still renders and shows why.
    pub fn call(&self, capability: Capability, args: &[Money]) -> String {
        let [income, expenses] = args else {
            return format!(
                "error: {} expects {} arguments",
                capability,
                capability.arity()
            );
        };

        match capability {
            Capability::AnnualSaveRate => match self.calculator.annual_savings(*income, *expenses) {
                Ok(savings) => savings.to_string(),
                Err(e) => format!("error: {e}"),
            },
            Capability::AnnualSaveRatePercent => {
                match self.calculator.annual_savings_rate_percent(*income, *expenses) {
                    Ok(rate) => format!("{rate:.2}%"),
                    Err(e) => format!("error: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picofi_core::Currency;

    fn eur(major: i64) -> Money {
        Money::from_major(major, Currency::Eur)
    }

    #[test]
    fn test_resolve() {
        let table = FunctionTable::new(Calculator::new(Currency::Eur));
        assert_eq!(table.resolve("annualSaveRate"), Some(Capability::AnnualSaveRate));
        assert_eq!(table.resolve("annualSaveRatePercent"), Some(Capability::AnnualSaveRatePercent));
        assert_eq!(table.resolve("deleteEverything"), None);

        let empty = FunctionTable::empty(Calculator::new(Currency::Eur));
        assert_eq!(empty.resolve("annualSaveRate"), None);
        let one = empty.with(Capability::AnnualSaveRate);
        assert_eq!(one.resolve("annualSaveRate"), Some(Capability::AnnualSaveRate));
    }

    #[test]
    fn test_call_formats_results() {
        let table = FunctionTable::new(Calculator::new(Currency::Eur));

        assert_eq!(
            table.call(Capability::AnnualSaveRate, &[eur(70_000), eur(50_000)]),
            "€20,000.00"
        );
        assert_eq!(
            table.call(Capability::AnnualSaveRatePercent, &[eur(100_000), eur(20_000)]),
            "80.00%"
        );
        assert_eq!(
            table.call(Capability::AnnualSaveRatePercent, &[eur(100_000), eur(150_000)]),
            "-50.00%"
        );
    }

    #[test]
    fn test_call_reports_errors_inline() {
        let table = FunctionTable::new(Calculator::new(Currency::Eur));

        assert_eq!(
            table.call(Capability::AnnualSaveRate, &[eur(-1), eur(0)]),
            "error: income can't be negative, don't include debt here"
        );
        assert!(table
            .call(Capability::AnnualSaveRatePercent, &[eur(0), eur(10)])
            .starts_with("error: savings rate is undefined"));
        assert!(table.call(Capability::AnnualSaveRate, &[eur(1)]).starts_with("error:"));
    }
}
