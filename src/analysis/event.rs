use fnv::FnvHashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::UEError;

use super::regions::{PerRegion, Region};
use super::variables::Var;

/// Regional quantities of one observable around one event axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionalView {
    pub gen_counts: PerRegion<u32>,
    pub gen_values: PerRegion<f64>,
    /// Reconstructed particle counts per region, all particles.
    pub rec_counts: PerRegion<u32>,
    /// Reconstructed counts split by `[gen_region][rec_region]`.
    pub rec_count_matrix: PerRegion<PerRegion<u32>>,
    pub rec_values: PerRegion<f64>,
}

/// Read-only access to one event as seen by the histogram filling.
///
/// `ivar` is the variation index (the position in `SYSTS`).
pub trait UEEvent {
    fn weight(&self, ivar: usize) -> Result<f64, UEError>;
    fn gen_pass_sel(&self) -> bool;
    fn rec_pass_sel(&self, ivar: usize) -> Result<bool, UEError>;
    fn gen_chmult(&self) -> u32;
    fn rec_chmult(&self, ivar: usize) -> Result<u32, UEError>;
    fn gen_value(&self, var: Var) -> Result<f64, UEError>;
    fn rec_value(&self, var: Var, ivar: usize) -> Result<f64, UEError>;
    fn regional(&self, obs: Var, axis: Var) -> Result<RegionalView, UEError>;
}

/// Per-axis block of an event record.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RegionalRecord {
    #[serde(rename = "gen_chmult_wrtTo")]
    pub gen_chmult: PerRegion<u32>,
    #[serde(rename = "rec_chmult_wrtTo")]
    pub rec_chmult: PerRegion<PerRegion<u32>>,
    #[serde(rename = "rec_chmult_incWrtTo")]
    pub rec_chmult_inc: PerRegion<u32>,
    #[serde(rename = "gen_wrtTo", default)]
    pub generated: FnvHashMap<Var, PerRegion<f64>>,
    #[serde(rename = "rec_incWrtTo", default)]
    pub rec_inc: FnvHashMap<Var, PerRegion<f64>>,
}

/// An event as written by the ntuple reader, one JSON value per event.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UEEventRecord {
    pub w: Vec<f64>,
    #[serde(rename = "gen_passSel")]
    pub gen_pass_sel: bool,
    #[serde(rename = "rec_passSel")]
    pub rec_pass_sel: Vec<bool>,
    pub gen_chmult: u32,
    pub rec_chmult: Vec<u32>,
    #[serde(rename = "gen", default)]
    pub generated: FnvHashMap<Var, f64>,
    #[serde(default)]
    pub rec: FnvHashMap<Var, Vec<f64>>,
    #[serde(rename = "wrtTo", default)]
    pub wrt: FnvHashMap<Var, RegionalRecord>,
}

impl UEEventRecord {
    /// Lazily read the records of a file holding concatenated JSON events.
    pub fn stream(path: &Path) -> Result<impl Iterator<Item = Result<Self, UEError>>, UEError> {
        let reader = BufReader::new(File::open(path)?);
        log::info!("Streaming events from {}", path.display());
        Ok(serde_json::Deserializer::from_reader(reader)
            .into_iter::<Self>()
            .map(|event| event.map_err(UEError::from)))
    }
}

fn per_variation<T: Copy>(values: &[T], field: &str, ivar: usize) -> Result<T, UEError> {
    values
        .get(ivar)
        .copied()
        .ok_or_else(|| UEError::MissingEventField(format!("{field}[{ivar}]")))
}

impl UEEvent for UEEventRecord {
    fn weight(&self, ivar: usize) -> Result<f64, UEError> {
        per_variation(&self.w, "w", ivar)
    }

    fn gen_pass_sel(&self) -> bool {
        self.gen_pass_sel
    }

    fn rec_pass_sel(&self, ivar: usize) -> Result<bool, UEError> {
        per_variation(&self.rec_pass_sel, "rec_passSel", ivar)
    }

    fn gen_chmult(&self) -> u32 {
        self.gen_chmult
    }

    fn rec_chmult(&self, ivar: usize) -> Result<u32, UEError> {
        per_variation(&self.rec_chmult, "rec_chmult", ivar)
    }

    fn gen_value(&self, var: Var) -> Result<f64, UEError> {
        if var == Var::ChMult {
            return Ok(f64::from(self.gen_chmult));
        }
        self.generated
            .get(&var)
            .copied()
            .ok_or_else(|| UEError::MissingEventField(format!("gen_{var}")))
    }

    fn rec_value(&self, var: Var, ivar: usize) -> Result<f64, UEError> {
        if var == Var::ChMult {
            return self.rec_chmult(ivar).map(f64::from);
        }
        let values = self
            .rec
            .get(&var)
            .ok_or_else(|| UEError::MissingEventField(format!("rec_{var}")))?;
        per_variation(values, &format!("rec_{var}"), ivar)
    }

    fn regional(&self, obs: Var, axis: Var) -> Result<RegionalView, UEError> {
        let record = self
            .wrt
            .get(&axis)
            .ok_or_else(|| UEError::MissingEventField(format!("wrtTo[{axis}]")))?;

        let (gen_values, rec_values) = if obs == Var::ChMult {
            (
                record.gen_chmult.map(f64::from),
                record.rec_chmult_inc.map(f64::from),
            )
        } else {
            let gen_values = record.generated.get(&obs).copied().ok_or_else(|| {
                UEError::MissingEventField(format!("gen_{obs}_wrtTo[{axis}]"))
            })?;
            let rec_values = record.rec_inc.get(&obs).copied().ok_or_else(|| {
                UEError::MissingEventField(format!("rec_{obs}_incWrtTo[{axis}]"))
            })?;
            (gen_values, rec_values)
        };

        Ok(RegionalView {
            gen_counts: record.gen_chmult,
            gen_values,
            rec_counts: record.rec_chmult_inc,
            rec_count_matrix: record.rec_chmult,
            rec_values,
        })
    }
}

impl RegionalView {
    pub fn gen_count(&self, region: Region) -> u32 {
        self.gen_counts[region.index()]
    }

    pub fn rec_count(&self, region: Region) -> u32 {
        self.rec_counts[region.index()]
    }

    pub fn matrix_count(&self, gen_region: Region, rec_region: Region) -> u32 {
        self.rec_count_matrix[gen_region.index()][rec_region.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "w": [1.5, 1.4],
        "gen_passSel": true,
        "rec_passSel": [true, false],
        "gen_chmult": 12,
        "rec_chmult": [10, 9],
        "gen": {"ptll": 42.0, "chflux": 80.5},
        "rec": {"ptll": [40.0, 41.0], "chflux": [75.0, 70.0]},
        "wrtTo": {
            "phittbar": {
                "gen_chmult_wrtTo": [4, 5, 3],
                "rec_chmult_wrtTo": [[3, 1, 0], [0, 4, 0], [0, 0, 2]],
                "rec_chmult_incWrtTo": [3, 5, 2],
                "gen_wrtTo": {"chflux": [20.0, 40.0, 20.5]},
                "rec_incWrtTo": {"chflux": [18.0, 38.0, 19.0]}
            }
        }
    }"#;

    #[test]
    fn test_record_accessors() {
        let ue: UEEventRecord = serde_json::from_str(RECORD).unwrap();
        assert_eq!(ue.weight(1).unwrap(), 1.4);
        assert!(!ue.rec_pass_sel(1).unwrap());
        assert_eq!(ue.gen_value(Var::PtLL).unwrap(), 42.0);
        assert_eq!(ue.gen_value(Var::ChMult).unwrap(), 12.0);
        assert_eq!(ue.rec_value(Var::ChFlux, 1).unwrap(), 70.0);
        assert_eq!(ue.rec_value(Var::ChMult, 0).unwrap(), 10.0);
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let ue: UEEventRecord = serde_json::from_str(RECORD).unwrap();
        assert!(matches!(ue.weight(5), Err(UEError::MissingEventField(f)) if f == "w[5]"));
        assert!(matches!(
            ue.gen_value(Var::Sphericity),
            Err(UEError::MissingEventField(f)) if f == "gen_sphericity"
        ));
        assert!(ue.regional(Var::ChFlux, Var::PhiLL).is_err());
        assert!(ue.regional(Var::ChAvgPt, Var::PhiTTbar).is_err());
    }

    #[test]
    fn test_regional_view() {
        let ue: UEEventRecord = serde_json::from_str(RECORD).unwrap();
        let view = ue.regional(Var::ChFlux, Var::PhiTTbar).unwrap();
        assert_eq!(view.gen_values, [20.0, 40.0, 20.5]);
        assert_eq!(view.rec_values, [18.0, 38.0, 19.0]);
        assert_eq!(view.matrix_count(Region::Toward, Region::Transverse), 1);
        assert_eq!(view.rec_count(Region::Away), 2);

        let mult = ue.regional(Var::ChMult, Var::PhiTTbar).unwrap();
        assert_eq!(mult.gen_values, [4.0, 5.0, 3.0]);
        assert_eq!(mult.rec_values, [3.0, 5.0, 2.0]);
    }

    #[test]
    fn test_stream_reads_concatenated_records() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{RECORD}").unwrap();
        writeln!(file, "{RECORD}").unwrap();
        write!(file, "{{\"w\": [1.0]}}").unwrap();
        file.flush().unwrap();

        let mut events = UEEventRecord::stream(file.path()).unwrap();
        assert_eq!(events.next().unwrap().unwrap().gen_chmult, 12);
        assert_eq!(events.next().unwrap().unwrap().rec_chmult, vec![10, 9]);
        assert!(matches!(events.next(), Some(Err(UEError::Json(_)))));
    }

    #[test]
    fn test_serde_keeps_record_field_names() {
        let ue: UEEventRecord = serde_json::from_str(RECORD).unwrap();
        let json = serde_json::to_value(&ue).unwrap();
        assert_eq!(json["gen"]["ptll"], 42.0);
        assert_eq!(json["wrtTo"]["phittbar"]["gen_wrtTo"]["chflux"][1], 40.0);
    }
}
