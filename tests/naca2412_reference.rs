use std::{error::Error, fs::File};

use approx::assert_relative_eq;
use csv::ReaderBuilder;
use ndarray::{Array1, Array2};
use ndarray_csv::Array2Reader;
use panelfoil::{
    influence::Family, kernel::LinearVortexTerms, naca::Naca4, FreeStream, PanelGeometry,
    ThickMethod, ThickSolver,
};

const MAX_RELATIVE: f64 = 5e-5;

fn read_array(name: &str) -> Result<Array2<f64>, Box<dyn Error>> {
    let file = File::open(format!("tests/NACA2412/{name}.csv"))?;
    let arr: Array2<f64> = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .delimiter(b',')
        .from_reader(file)
        .deserialize_array2_dynamic()?;
    Ok(arr)
}

fn read_vector(name: &str) -> Result<Array1<f64>, Box<dyn Error>> {
    Ok(read_array(name)?.column(0).to_owned())
}

/// NACA 2412 with 10 panels, 5 on each surface
fn naca2412_geometry() -> Result<PanelGeometry, Box<dyn Error>> {
    let contour = Naca4::parse("2412")?.closed_contour(10)?;
    Ok(PanelGeometry::closed(contour.view(), 10)?)
}

fn alpha() -> FreeStream {
    FreeStream::from_degrees(8.0)
}

#[test]
fn test_geometric_terms_of_last_pair() -> Result<(), Box<dyn Error>> {
    let geometry = naca2412_geometry()?;
    let panels = geometry.panels();
    let terms = LinearVortexTerms::new(&panels[9], &panels[8]);
    assert_relative_eq!(terms.a, -0.30074680202253584, max_relative = MAX_RELATIVE);
    assert_relative_eq!(terms.b, 0.0904534136839456, max_relative = MAX_RELATIVE);
    assert_relative_eq!(terms.c, -0.045227355204173834, max_relative = MAX_RELATIVE);
    assert_relative_eq!(terms.d, 0.9989767196192489, max_relative = MAX_RELATIVE);
    assert_relative_eq!(terms.e, 0.0021851217730942327, max_relative = MAX_RELATIVE);
    assert_relative_eq!(terms.f, -3.6571407713042885, epsilon = 5e-10);
    assert_relative_eq!(terms.g, 0.03797726355934574, max_relative = MAX_RELATIVE);
    assert_relative_eq!(terms.p, -0.015784868222446846, max_relative = MAX_RELATIVE);
    assert_relative_eq!(terms.q, 0.30034022644185643, max_relative = MAX_RELATIVE);
    Ok(())
}

#[test]
fn test_coefficient_families() -> Result<(), Box<dyn Error>> {
    let geometry = naca2412_geometry()?;
    let solver = ThickSolver::new(&geometry, ThickMethod::LinearVortex)?;
    let influence = solver.influence();
    for (family, name) in [
        (Family::CN1, "cn1"),
        (Family::CN2, "cn2"),
        (Family::CT1, "ct1"),
        (Family::CT2, "ct2"),
    ] {
        let calc = influence.get(family).ok_or("missing family")?;
        assert_relative_eq!(calc, read_array(name)?, max_relative = MAX_RELATIVE);
    }
    Ok(())
}

#[test]
fn test_system_matrices() -> Result<(), Box<dyn Error>> {
    let geometry = naca2412_geometry()?;
    let solver = ThickSolver::new(&geometry, ThickMethod::LinearVortex)?;
    assert_relative_eq!(solver.matrix(), read_array("an")?, max_relative = MAX_RELATIVE);
    assert_relative_eq!(solver.tangential(), read_array("at")?, max_relative = MAX_RELATIVE);
    Ok(())
}

#[test]
fn test_rhs() -> Result<(), Box<dyn Error>> {
    let geometry = naca2412_geometry()?;
    let solver = ThickSolver::new(&geometry, ThickMethod::LinearVortex)?;
    assert_relative_eq!(
        solver.rhs(&alpha())?,
        read_vector("rhs")?,
        max_relative = MAX_RELATIVE
    );
    Ok(())
}

#[test]
fn test_strengths_velocity_and_cp() -> Result<(), Box<dyn Error>> {
    let geometry = naca2412_geometry()?;
    let solver = ThickSolver::new(&geometry, ThickMethod::LinearVortex)?;
    let solution = solver.solve(&alpha())?;
    assert_relative_eq!(
        solution.strengths(),
        read_vector("gamma")?,
        max_relative = MAX_RELATIVE
    );
    assert_relative_eq!(
        solution.tangential_velocity(),
        read_vector("v_tangential")?,
        max_relative = MAX_RELATIVE
    );
    assert_relative_eq!(solution.cp(), read_vector("cp")?, max_relative = MAX_RELATIVE);
    Ok(())
}
