//! Flow model handle loaded from a MODFLOW name file
//!
//! Loading is lenient: only DIS and the requested packages are read,
//! and entries the coupler has no use for are skipped even when their
//! files are missing.

use std::path::{Path, PathBuf};

use crate::core::error::{CouplerError, Result};
use crate::core::grid::Grid;
use crate::modflow::dis::{Discretization, StressPeriod};
use crate::modflow::rch::RechargePackage;

/// Packages the coupler knows how to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Package {
    Rch,
}

impl Package {
    pub fn ftype(&self) -> &'static str {
        match self {
            Package::Rch => "RCH",
        }
    }
}

/// One `FTYPE NUNIT FNAME` entry of a name file
#[derive(Debug, Clone, PartialEq)]
pub struct NameEntry {
    pub ftype: String,
    pub unit: i32,
    pub fname: String,
}

pub fn read_name_file(path: &Path) -> Result<Vec<NameEntry>> {
    let content = std::fs::read_to_string(path)?;
    parse_name_file(&content, path)
}

pub fn parse_name_file(content: &str, path: &Path) -> Result<Vec<NameEntry>> {
    let mut entries = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let (Some(ftype), Some(unit), Some(fname)) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(CouplerError::Parse {
                file: path.to_path_buf(),
                line: line_no + 1,
                message: "expected FTYPE NUNIT FNAME".into(),
            });
        };
        let unit = unit.parse().map_err(|_| CouplerError::Parse {
            file: path.to_path_buf(),
            line: line_no + 1,
            message: format!("invalid unit number '{}'", unit),
        })?;
        entries.push(NameEntry {
            ftype: ftype.to_ascii_uppercase(),
            unit,
            fname: fname.trim_matches(|c| c == '\'' || c == '"').to_string(),
        });
    }
    Ok(entries)
}

/// Locate the model's name file inside its directory
pub fn scan_for_model_file(dir: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("nam"))
                    .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    if candidates.len() > 1 {
        tracing::warn!(
            "Found {} name files in {}, using {}",
            candidates.len(),
            dir.display(),
            candidates[0].display()
        );
    }
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| CouplerError::ModelFileNotFound(dir.to_path_buf()))
}

#[derive(Debug, Clone)]
pub struct ModflowModel {
    nam: PathBuf,
    dis: Discretization,
    recharge: Option<LoadedRecharge>,
}

#[derive(Debug, Clone)]
struct LoadedRecharge {
    path: PathBuf,
    package: RechargePackage,
}

impl ModflowModel {
    pub fn load(nam: &Path, load_only: &[Package]) -> Result<Self> {
        let model_dir = nam.parent().map(Path::to_path_buf).unwrap_or_default();
        let entries = read_name_file(nam)?;

        let find = |ftype: &str| entries.iter().find(|e| e.ftype == ftype);

        let dis_entry = find("DIS").ok_or_else(|| CouplerError::MissingPackage {
            package: "DIS".into(),
            nam: nam.to_path_buf(),
        })?;
        let dis = Discretization::load(&model_dir.join(&dis_entry.fname), &model_dir)?;

        for entry in &entries {
            let requested = load_only.iter().any(|p| p.ftype() == entry.ftype);
            if entry.ftype != "DIS" && !requested {
                tracing::debug!("Skipping {} package ({})", entry.ftype, entry.fname);
            }
        }

        let mut recharge = None;
        if load_only.contains(&Package::Rch) {
            let entry = find(Package::Rch.ftype()).ok_or_else(|| CouplerError::MissingPackage {
                package: Package::Rch.ftype().into(),
                nam: nam.to_path_buf(),
            })?;
            let path = model_dir.join(&entry.fname);
            let package = RechargePackage::load(&path, &model_dir, dis.nrow, dis.ncol, dis.nper())?;
            recharge = Some(LoadedRecharge { path, package });
        }

        tracing::debug!(
            "Loaded model {} ({} layers, {}x{} cells, {} stress periods)",
            nam.display(),
            dis.nlay,
            dis.nrow,
            dis.ncol,
            dis.nper()
        );

        Ok(Self {
            nam: nam.to_path_buf(),
            dis,
            recharge,
        })
    }

    pub fn stress_periods(&self) -> &[StressPeriod] {
        &self.dis.stress_periods
    }

    pub fn grid_dims(&self) -> (usize, usize) {
        (self.dis.nrow, self.dis.ncol)
    }

    pub fn recharge(&self) -> Result<&RechargePackage> {
        self.recharge
            .as_ref()
            .map(|r| &r.package)
            .ok_or_else(|| self.missing_rch())
    }

    /// Replace the recharge rates and persist the package
    ///
    /// NRCHOP, IRCHCB and the IRCH layer arrays are carried over from the
    /// package that was loaded.
    pub fn write_recharge(&mut self, rech: Vec<Grid<f64>>) -> Result<()> {
        let missing = self.missing_rch();
        let loaded = self.recharge.as_mut().ok_or(missing)?;
        loaded.package = loaded.package.with_recharge(rech);
        loaded.package.write(&loaded.path)?;
        tracing::info!("Wrote recharge package {}", loaded.path.display());
        Ok(())
    }

    fn missing_rch(&self) -> CouplerError {
        CouplerError::MissingPackage {
            package: Package::Rch.ftype().into(),
            nam: self.nam.clone(),
        }
    }
}
