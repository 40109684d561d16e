use crate::core::models::artifacts::ArtifactError;
use ndarray::{Array1, Array2, ArrayD, Axis, Dimension, Ix1, Ix2, IxDyn, OwnedRepr};
use ndarray_npy::NpzReader;
use std::fs::File;
use std::path::Path;
use tracing::trace;

/// Reads the per-token pLDDT array and rescales it from 0-1 to 0-100.
pub fn read_plddt(path: &Path) -> Result<Array1<f64>, ArtifactError> {
    let array = read_named(path, "plddt")?;
    let plddt: Array1<f64> = into_dim::<Ix1>(path, "plddt", array)?;
    Ok(plddt.mapv(|v| v * 100.0))
}

/// Reads the square predicted aligned error matrix, in angstroms.
pub fn read_pae(path: &Path) -> Result<Array2<f64>, ArtifactError> {
    let array = read_named(path, "pae")?;
    let pae: Array2<f64> = into_dim::<Ix2>(path, "pae", array)?;
    if pae.nrows() != pae.ncols() {
        return Err(ArtifactError::malformed(
            path,
            format!("PAE matrix is not square ({}x{})", pae.nrows(), pae.ncols()),
        ));
    }
    Ok(pae)
}

fn read_named(path: &Path, key: &str) -> Result<ArrayD<f64>, ArtifactError> {
    let file = File::open(path).map_err(|e| ArtifactError::from_io(path, e))?;
    let mut npz = NpzReader::new(file).map_err(|e| ArtifactError::malformed(path, e))?;
    let names = npz.names().map_err(|e| ArtifactError::malformed(path, e))?;

    let name = [format!("{}.npy", key), key.to_string()]
        .into_iter()
        .find(|candidate| names.contains(candidate))
        .ok_or_else(|| {
            ArtifactError::malformed(
                path,
                format!("array '{}' not present (found: {})", key, names.join(", ")),
            )
        })?;

    match npz.by_name::<OwnedRepr<f32>, IxDyn>(&name) {
        Ok(array) => Ok(array.mapv(f64::from)),
        Err(e) => {
            trace!("'{}' is not float32 ({}), retrying as float64", name, e);
            npz.by_name::<OwnedRepr<f64>, IxDyn>(&name)
                .map_err(|e| ArtifactError::malformed(path, e))
        }
    }
}

fn into_dim<D: Dimension>(
    path: &Path,
    key: &str,
    mut array: ArrayD<f64>,
) -> Result<ndarray::Array<f64, D>, ArtifactError> {
    let target = D::NDIM.unwrap_or(array.ndim());
    while array.ndim() > target && array.shape()[0] == 1 {
        array = array.index_axis_move(Axis(0), 0);
    }
    let shape = array.shape().to_vec();
    array.into_dimensionality::<D>().map_err(|_| {
        ArtifactError::malformed(
            path,
            format!("array '{}' has shape {:?}, expected {} dimension(s)", key, shape, target),
        )
    })
}
