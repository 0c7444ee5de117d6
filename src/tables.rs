use std::fmt::Display;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    config::TariffConfig,
    core::{breakdown::MonthlyCostBreakdown, comparison::Comparison, detail::IntervalDetail},
    fmt::FormattedPercentage,
    quantity::{cost::Cost, energy::KilowattHours, power::Kilowatts, price::MegawattHourPrice},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn right(content: impl Display) -> Cell {
    Cell::new(content).set_alignment(CellAlignment::Right)
}

/// One column per bill, line items as rows.
pub fn build_breakdown_table(bills: &[(&str, MonthlyCostBreakdown)]) -> Table {
    let mut table = new_table();
    table.set_header(
        std::iter::once(Cell::new("")).chain(bills.iter().map(|(name, _)| right(name))),
    );

    let mut add_row = |label: &str, value: &dyn Fn(&MonthlyCostBreakdown) -> String| {
        table.add_row(
            std::iter::once(Cell::new(label))
                .chain(bills.iter().map(|(_, bill)| right(value(bill)))),
        );
    };
    add_row("Consumption", &|bill| bill.total_kwh_delivered.to_string());
    add_row("Injection", &|bill| bill.total_kwh_returned.to_string());
    add_row("Peak power", &|bill| bill.peak_power_kw.to_string());
    add_row("Fixed cost", &|bill| bill.fixed_cost.to_string());
    add_row("Energy cost", &|bill| bill.energy_cost.to_string());
    add_row("Distribution", &|bill| bill.distribution_cost.to_string());
    add_row("Injection fee", &|bill| bill.injection_cost.to_string());
    add_row("GSC", &|bill| bill.gsc_cost.to_string());
    add_row("WKK", &|bill| bill.wkk_cost.to_string());
    add_row("Capacity", &|bill| bill.capacity_cost.to_string());
    add_row("Energy revenue", &|bill| (-bill.energy_revenue).to_string());
    add_row("Average ex. VAT", &|bill| bill.average_price_per_kwh_ex_vat().to_string());
    add_row("Average incl. VAT", &|bill| bill.average_price_per_kwh_incl_vat().to_string());

    table.add_row(
        std::iter::once(Cell::new("Total").add_attribute(Attribute::Bold)).chain(
            bills.iter().map(|(_, bill)| right(bill.total_cost()).add_attribute(Attribute::Bold)),
        ),
    );
    table
}

pub fn build_comparison_table(comparison: &Comparison) -> Table {
    let difference = comparison.difference();
    let color = if difference > Cost::ZERO {
        Color::Green
    } else if difference < Cost::ZERO {
        Color::Red
    } else {
        Color::Reset
    };
    let cheaper = if difference > Cost::ZERO {
        "dynamic"
    } else if difference < Cost::ZERO {
        "fixed"
    } else {
        "neither"
    };

    let mut table = new_table();
    table.add_row(vec![Cell::new("Cheaper tariff"), right(cheaper).fg(color)]);
    table.add_row(vec![Cell::new("Fixed minus dynamic"), right(difference).fg(color)]);
    table.add_row(vec![
        Cell::new("Relative to dynamic"),
        right(
            comparison
                .relative_difference()
                .map_or_else(|| "n/a".to_string(), |it| FormattedPercentage(it).to_string()),
        )
        .fg(color),
    ]);
    table.add_row(vec![
        Cell::new("Average dynamic energy rate"),
        right(comparison.average_dynamic_energy_rate()),
    ]);
    table.add_row(vec![
        Cell::new("Fixed energy rate").add_attribute(Attribute::Dim),
        right(comparison.fixed_energy_rate).add_attribute(Attribute::Dim),
    ]);
    table
}

pub fn build_intervals_table(details: &[IntervalDetail]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Date",
        "Start",
        "Consumption",
        "Injection",
        "Price",
        "Dynamic",
        "Fixed",
    ]);
    for detail in details {
        table.add_row(vec![
            Cell::new(detail.timestamp.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(detail.timestamp.format("%H:%M")),
            right(detail.consumption).fg(if detail.consumption > Kilowatts::ZERO {
                Color::Reset
            } else {
                Color::DarkGrey
            }),
            right(detail.injection).fg(if detail.injection > Kilowatts::ZERO {
                Color::Green
            } else {
                Color::DarkGrey
            }),
            detail.price.map_or_else(
                || right("missing").fg(Color::Red),
                |price| {
                    right(price).fg(if price < MegawattHourPrice::ZERO {
                        Color::Green
                    } else {
                        Color::Reset
                    })
                },
            ),
            right(detail.dynamic_net()),
            right(detail.fixed_net()),
        ]);
    }

    let delivered: KilowattHours = details.iter().map(IntervalDetail::delivered).sum();
    let returned: KilowattHours = details.iter().map(IntervalDetail::returned).sum();
    let dynamic: Cost = details.iter().map(IntervalDetail::dynamic_net).sum();
    let fixed: Cost = details.iter().map(IntervalDetail::fixed_net).sum();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(details.len()).add_attribute(Attribute::Dim),
        right(delivered).add_attribute(Attribute::Bold),
        right(returned).add_attribute(Attribute::Bold),
        Cell::new(""),
        right(dynamic).add_attribute(Attribute::Bold),
        right(fixed).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Effective per-unit rates, for eyeballing what a configuration resolves to.
pub fn build_rates_table(config: &TariffConfig) -> Table {
    let dynamic = &config.dynamic;
    let fixed = &config.fixed;

    let mut table = new_table();
    table.set_header(vec!["", "Dynamic", "Fixed"]);
    table.add_row(vec![
        Cell::new("Subscriptions"),
        right(dynamic.fixed_cost()),
        right(fixed.fixed_cost()),
    ]);
    table.add_row(vec![
        Cell::new("Energy"),
        right(format!(
            "{} × EPEX + {}",
            dynamic.consumption.coefficient, dynamic.consumption.offset
        )),
        right(fixed.flat_rate()),
    ]);
    table.add_row(vec![
        Cell::new("Injection"),
        right(format!("{} × EPEX + {}", dynamic.injection.coefficient, dynamic.injection.offset)),
        right(fixed.injection_rate),
    ]);
    for (label, lhs, rhs) in [
        ("Distribution", dynamic.grid.distribution, fixed.grid.distribution),
        ("Injection fee", dynamic.grid.injection, fixed.grid.injection),
        ("GSC", dynamic.grid.gsc, fixed.grid.gsc),
        ("WKK", dynamic.grid.wkk, fixed.grid.wkk),
    ] {
        table.add_row(vec![Cell::new(label), right(lhs), right(rhs)]);
    }
    table.add_row(vec![
        Cell::new("Capacity"),
        right(dynamic.grid.capacity),
        right(fixed.grid.capacity),
    ]);
    for bracket in fixed.excise.brackets() {
        let label = bracket
            .up_to
            .map_or_else(|| "Excise, beyond".to_string(), |up_to| format!("Excise, up to {up_to}"));
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Dim),
            Cell::new(""),
            right(bracket.rate).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tariff::fixed::FixedTariff;

    fn bill(energy_cost: f64) -> MonthlyCostBreakdown {
        MonthlyCostBreakdown::builder()
            .year(2024)
            .month(1)
            .fixed_cost(Cost::from(7.0))
            .energy_cost(Cost::from(energy_cost))
            .energy_revenue(Cost::from(3.0))
            .distribution_cost(Cost::ZERO)
            .injection_cost(Cost::ZERO)
            .gsc_cost(Cost::ZERO)
            .wkk_cost(Cost::ZERO)
            .capacity_cost(Cost::ZERO)
            .total_kwh_delivered(KilowattHours::from(100.0))
            .total_kwh_returned(KilowattHours::from(150.0))
            .peak_power_kw(Kilowatts::from(4.0))
            .build()
    }

    #[test]
    fn test_breakdown_table() {
        let table = build_breakdown_table(&[("dynamic", bill(10.0)), ("fixed", bill(20.0))])
            .force_no_tty()
            .to_string();
        assert!(table.contains("dynamic"));
        assert!(table.contains("14.00 €"));
        assert!(table.contains("24.00 €"));
        assert!(table.contains("-3.00 €"));
    }

    #[test]
    fn test_comparison_table() {
        let comparison = Comparison::new(bill(10.0), bill(20.0), &FixedTariff::default());
        let table = build_comparison_table(&comparison).force_no_tty().to_string();
        assert!(table.contains("dynamic"));
        assert!(table.contains("+71.4%"));
    }

    #[test]
    fn test_rates_table() {
        let table = build_rates_table(&TariffConfig::default()).force_no_tty().to_string();
        assert!(table.contains("Excise, up to 3000.00 kWh"));
        assert!(table.contains("Excise, beyond"));
        assert!(table.contains("56.93 €/kW/year"));
    }
}
