use anyhow::{bail, Result};
use std::env;
use std::fs;
use std::path::Path;

use calculateur::{Session, TariffCatalog};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut month: Option<String> = None;
    let mut export: Option<Option<String>> = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--export" => {
                // Optional explicit output path; defaults to the
                // conventional calculateur-<month>.csv
                export = Some(iter.next().cloned());
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ if file.is_none() => file = Some(arg.clone()),
            _ if month.is_none() => month = Some(arg.clone()),
            _ => bail!("Unexpected argument: {}", arg),
        }
    }

    let Some(file) = file else {
        print_usage();
        std::process::exit(1);
    };

    let catalog = TariffCatalog::builtin();
    let mut session = Session::new();
    session.load_file(Path::new(&file))?;
    if let Some(month) = month {
        session.set_selected_month(month);
    }

    print_report(&session, &catalog);

    if let Some(out_path) = export {
        let csv = session.export_csv(&catalog)?;
        let out_path = out_path.unwrap_or_else(|| session.export_file_name());
        fs::write(&out_path, csv)?;
        println!("\n💾 Export geschrieben: {}", out_path);
    }

    Ok(())
}

fn print_usage() {
    println!("calculateur {}", calculateur::VERSION);
    println!();
    println!("Usage: calculateur <export.csv> [YYYY-MM] [--export [datei.csv]]");
    println!();
    println!("  <export.csv>   Agenda-Export (ISO-8859-1, Semikolon-getrennt)");
    println!("  [YYYY-MM]      Abrechnungsmonat (Standard: aktueller Monat)");
    println!("  --export       Zusammenfassung als CSV schreiben");
}

fn print_report(session: &Session, catalog: &TariffCatalog) {
    println!("🧾 Calculateur - Abrechnungsübersicht");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Datei: {}", session.file_name());
    println!("📅 Monat: {}", session.selected_month());

    let stats = session.stats();
    println!(
        "📊 Zeilen: {} gesamt, {} gültig, {} übersprungen",
        stats.total_rows, stats.valid_rows, stats.skipped_rows
    );

    if !session.warning().is_empty() {
        println!("⚠️  {}", session.warning());
    }

    let reports = session.employee_reports(catalog);

    if reports.is_empty() {
        if session.has_data() {
            println!("\nKeine Einträge für {} gefunden.", session.selected_month());
        } else {
            println!("\nNoch keine Datei geladen.");
        }
        return;
    }

    for report in &reports {
        println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("👤 {} ({})", report.name, report.profession);

        for (code, sum) in &report.sums {
            let description = sum
                .tariff
                .as_ref()
                .map(|t| t.description.as_str())
                .unwrap_or("unbekannter Tarif");
            println!("   {:<12} {:>5} min  {}", code, sum.minutes, description);
        }
        println!("   Total: {} min", report.total_minutes());

        for violation in &report.violations {
            println!("   ⚠️  {}", violation.message);
        }
    }
}
