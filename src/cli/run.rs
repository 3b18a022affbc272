use crate::error::Result;
use crate::manifest::read_manifest;
use crate::oracle::{read_input, Oracle, Response};
use crate::solver::solver_for;
use std::io::{Read, Write};
use std::path::Path;

/// Serve one invocation of the instance described by `manifest_path`.
/// Reads `input` to end, writes the response to `out`.
pub fn run_instance<R: Read>(manifest_path: &Path, input: R, out: &mut dyn Write) -> Result<Response> {
    let manifest = read_manifest(manifest_path)?;
    let oracle = Oracle::from_manifest(&manifest)?;
    let solver = solver_for(manifest.solver.as_deref())?;

    let input = read_input(input)?;
    let response = oracle.respond(&input, solver.as_ref(), out)?;
    out.flush()?;
    Ok(response)
}
