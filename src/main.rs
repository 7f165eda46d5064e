use std::{error::Error, fs::File};

use csv::ReaderBuilder;
use log::info;
use ndarray::Array2;
use ndarray_csv::Array2Reader;

use panelfoil::{naca::Naca4, FreeStream, PanelGeometry, ThickMethod, ThickSolver};

/// Solve a polar for a closed contour read from a headerless `x, y` csv file,
/// or for a NACA 2412 when no file is given.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let contour = match std::env::args().nth(1) {
        Some(path) => read_contour(&path)?,
        None => Naca4::parse("2412")?.closed_contour(160)?,
    };
    let geometry = PanelGeometry::closed(contour.view(), contour.nrows().saturating_sub(1))?;
    info!("chord {} with {} panels", geometry.chord(), geometry.len());

    let freestreams: Vec<_> = (-4..=12)
        .map(|alpha| FreeStream::from_degrees(alpha as f64))
        .collect();
    for method in [ThickMethod::LinearVortex, ThickMethod::SourceVortex] {
        let solver = ThickSolver::new(&geometry, method)?;
        for solution in solver.sweep(&freestreams)? {
            let coefficients = solution.coefficients();
            println!(
                "{:?}\talpha = {:5.1}°\tcl = {:.4}\tcl_p = {:.4}\tcd_p = {:.5}\tcm = {:.4}",
                method,
                solution.freestream().alpha().to_degrees(),
                solution.cl(),
                coefficients.cl,
                coefficients.cd,
                coefficients.cm
            );
        }
    }
    Ok(())
}

fn read_contour(path: &str) -> Result<Array2<f64>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .delimiter(b',')
        .from_reader(file);
    Ok(reader.deserialize_array2_dynamic()?)
}
