//! Fixture builders shared by unit tests.

use std::path::Path;

/// A physical-table line with the given key fields; other columns are filler.
pub fn physical_line(name: &str, tstar: f64, mstar: f64, rstar: f64, mplanet: f64, rplanet: f64) -> String {
    let mut tokens = vec!["0".to_string(); 39];
    tokens[0] = name.to_string();
    tokens[1] = tstar.to_string();
    tokens[2] = "0.02".to_string();
    tokens[7] = mstar.to_string();
    tokens[10] = rstar.to_string();
    tokens[11] = "4.40".to_string();
    tokens[23] = "9.99".to_string();
    tokens[26] = mplanet.to_string();
    tokens[29] = rplanet.to_string();
    tokens[32] = "99.0".to_string();
    tokens[35] = "9.9".to_string();
    tokens[38] = "9999".to_string();
    tokens.join(" ")
}

/// An observables-table line with the given key fields; other columns are filler.
pub fn observable_line(name: &str, vmag: f64, kmag: f64, tdur: f64, tdepth: f64, period: f64) -> String {
    let mut tokens = vec!["00".to_string(); 15];
    tokens[0] = name.to_string();
    tokens[8] = vmag.to_string();
    tokens[9] = kmag.to_string();
    tokens[10] = tdur.to_string();
    tokens[11] = tdepth.to_string();
    tokens[14] = period.to_string();
    tokens.join(" ")
}

/// Write both cache files (with a header line each) into `dir`.
pub fn write_tables(dir: &Path, observables: &[String], physical: &[String]) {
    let render = |lines: &[String]| {
        let mut text = String::from("#System  header  line\n");
        for l in lines {
            text.push_str(l);
            text.push('\n');
        }
        text
    };
    std::fs::write(dir.join("tepcat1.txt"), render(observables)).unwrap();
    std::fs::write(dir.join("tepcat2.txt"), render(physical)).unwrap();
}
