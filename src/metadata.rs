//! NetCDF dataset inspection
//!
//! Used by `--list-vars` to show what a track dataset contains and whether
//! the configured track variables are present before running a conversion.

use crate::config::VariableNames;
use crate::errors::Result;
use netcdf::{AttributeValue, File};

/// Information about a dimension
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionInfo {
    pub name: String,
    pub length: usize,
    pub is_unlimited: bool,
}

/// One configured track variable and what the dataset holds for it
#[derive(Debug, Clone, PartialEq)]
pub struct TrackVariableInfo {
    pub role: &'static str,
    pub name: String,
    pub dimensions: Option<Vec<DimensionInfo>>,
    pub units: Option<String>,
}

impl TrackVariableInfo {
    pub fn is_present(&self) -> bool {
        self.dimensions.is_some()
    }
}

/// Track-oriented summary of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetLayout {
    /// Storm count, taken from the leading dimension of the pressure variable
    pub storms: Option<usize>,
    /// Observation slots per storm
    pub observation_slots: Option<usize>,
    pub variables: Vec<TrackVariableInfo>,
}

impl DatasetLayout {
    pub fn missing_variables(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| !v.is_present())
            .map(|v| v.name.as_str())
            .collect()
    }

    pub fn print(&self) {
        println!("\n Track Layout");
        println!("================");
        match (self.storms, self.observation_slots) {
            (Some(storms), Some(slots)) => {
                println!("    {} storms x {} observation slots", storms, slots)
            }
            _ => println!("    (pressure variable missing or not 2-D)"),
        }
        for var in &self.variables {
            match &var.dimensions {
                Some(dims) => {
                    let dims: Vec<String> = dims
                        .iter()
                        .map(|d| format!("{}[{}]", d.name, d.length))
                        .collect();
                    let units = var
                        .units
                        .as_deref()
                        .map(|u| format!(" ({})", u))
                        .unwrap_or_default();
                    println!(
                        "    ✅ {:<9} {} ({}){}",
                        var.role,
                        var.name,
                        dims.join(", "),
                        units
                    );
                }
                None => println!("    ⚠ {:<9} {} not found", var.role, var.name),
            }
        }
    }
}

/// Summarise the configured track variables of a dataset.
pub fn describe_dataset(file: &File, names: &VariableNames) -> DatasetLayout {
    let roles = [
        ("storm id", &names.storm_id),
        ("time", &names.time),
        ("latitude", &names.lat),
        ("longitude", &names.lon),
        ("pressure", &names.pressure),
        ("basin", &names.basin),
    ];

    let variables: Vec<TrackVariableInfo> = roles
        .iter()
        .map(|(role, name)| {
            let var = file.variable(name);
            TrackVariableInfo {
                role: *role,
                name: name.to_string(),
                dimensions: var.as_ref().map(|v| {
                    v.dimensions()
                        .iter()
                        .map(|d| DimensionInfo {
                            name: d.name().to_string(),
                            length: d.len(),
                            is_unlimited: d.is_unlimited(),
                        })
                        .collect()
                }),
                units: var.as_ref().and_then(|v| string_attribute(v.attribute("units"))),
            }
        })
        .collect();

    let pressure_dims = variables
        .iter()
        .find(|v| v.role == "pressure")
        .and_then(|v| v.dimensions.as_ref())
        .filter(|dims| dims.len() == 2);

    DatasetLayout {
        storms: pressure_dims.map(|dims| dims[0].length),
        observation_slots: pressure_dims.map(|dims| dims[1].length),
        variables,
    }
}

fn string_attribute(attr: Option<netcdf::Attribute>) -> Option<String> {
    match attr?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Lists all variables and dimensions in a clean, organized format.
pub fn list_variables_and_dimensions(file: &File) -> Result<()> {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by_key(|d| d.name());

    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    } else {
        for dim in dimensions {
            let length_info = if dim.is_unlimited() {
                format!("{} (unlimited)", dim.len())
            } else {
                dim.len().to_string()
            };
            println!("    {} = {}", dim.name(), length_info);
        }
    }

    println!("\n Variables");
    println!("=============");

    let mut variables: Vec<_> = file.variables().collect();
    variables.sort_by_key(|v| v.name());

    if variables.is_empty() {
        println!("   (No variables found)");
    } else {
        for var in variables {
            let data_type = format!("{:?}", var.vartype()).to_lowercase();
            let dims: Vec<String> = var
                .dimensions()
                .iter()
                .map(|d| format!("{}[{}]", d.name(), d.len()))
                .collect();

            if dims.is_empty() {
                println!("    {} ({}): scalar", var.name(), data_type);
            } else {
                println!("    {} ({}): [{}]", var.name(), data_type, dims.join(", "));
            }

            let key_attrs: Vec<String> = ["units", "long_name"]
                .iter()
                .filter_map(|name| {
                    string_attribute(var.attribute(name)).map(|v| format!("{}: {}", name, v))
                })
                .collect();

            if !key_attrs.is_empty() {
                println!("      └─ {}", key_attrs.join(", "));
            }
        }
    }

    println!("\n💡 Tip: Use --threshold <hPa> to choose the central pressure cut-off");
    println!("💡 Tip: Use --basin to add the basin code column");

    Ok(())
}
