use std::{ fs, path::PathBuf };
use serde_json::json;
use tiltbec::{
    model,
    params::{ Grid, Params },
    render::{ self, RenderConfig },
};

// evaluate the model once at the default form parameters and write the figure
// and raw arrays to disk

const ALPHA: f64 = 0.05; // tilt strength
const G: f64 = 0.5; // interaction strength
const MU: f64 = 1.0; // chemical potential

fn main() -> anyhow::Result<()> {
    let params = Params { alpha: ALPHA, g: G, mu: MU }.validate()?;
    let ev = model::evaluate(params, Grid::default())?;
    println!("peak density: n0 = {:.3}", ev.n0());

    let png = render::render_png(&ev, RenderConfig::default())?;
    let data = json!({
        "alpha": ALPHA,
        "g": G,
        "mu": MU,
        "n0": ev.n0(),
        "x": ev.x().to_vec(),
        "psi_re": ev.psi_real().to_vec(),
        "psi_im": ev.psi_imag().to_vec(),
        "k": ev.k().to_vec(),
        "E": ev.E().to_vec(),
    });

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    fs::write(outdir.join("bec.png"), &png)?;
    fs::write(outdir.join("bec.json"), serde_json::to_string(&data)?)?;
    println!("wrote {}", outdir.display());
    Ok(())
}
