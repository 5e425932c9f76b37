//! Phong materials and `.mtl` reading/writing
//!
//! A [`Material`] pairs a name with [`PhongModel`] reflectance parameters and a
//! transparency. Material libraries are parsed with `tobj` and written back in
//! the same subset of the MTL format.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TartanError};

/// Phong reflectance parameters, also used for light colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongModel {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    shininess: f32,
}

impl PhongModel {
    pub const MIN_SHININESS: f32 = 0.0;
    pub const MAX_SHININESS: f32 = 1000.0;
    pub const DEFAULT_SHININESS: f32 = 64.0;

    pub fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        let mut phong = Self {
            ambient,
            diffuse,
            specular,
            shininess: Self::DEFAULT_SHININESS,
        };
        phong.set_shininess(shininess);
        phong
    }

    /// Same colour for every component, scaled like the defaults
    pub fn from_color(color: [f32; 3]) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            specular: color.map(|c| c * 0.5),
            ..Self::default()
        }
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Sets the specular exponent, clamped to `[0, 1000]`
    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess.clamp(Self::MIN_SHININESS, Self::MAX_SHININESS);
    }
}

impl Default for PhongModel {
    fn default() -> Self {
        Self {
            ambient: [1.0, 1.0, 1.0],
            diffuse: [1.0, 1.0, 1.0],
            specular: [0.5, 0.5, 0.5],
            shininess: Self::DEFAULT_SHININESS,
        }
    }
}

/// Surface material of a model unit
///
/// Transparency runs from 0 (opaque) to 1 (invisible).
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub phong: PhongModel,
    transparency: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Material".to_string(),
            phong: PhongModel::default(),
            transparency: 0.0,
        }
    }
}

impl Material {
    pub fn new(name: &str, phong: PhongModel, transparency: f32) -> Self {
        let mut material = Self {
            name: name.to_string(),
            phong,
            transparency: 0.0,
        };
        material.set_transparency(transparency);
        material
    }

    /// Builder pattern: Set all Phong colours from one RGB value
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.phong = PhongModel {
            shininess: self.phong.shininess,
            ..PhongModel::from_color([r, g, b])
        };
        self
    }

    /// Builder pattern: Set transparency
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.set_transparency(transparency);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    /// Sets transparency, clamped to `[0, 1]`
    pub fn set_transparency(&mut self, transparency: f32) {
        self.transparency = transparency.clamp(0.0, 1.0);
    }

    /// Opacity written to the alpha channel
    pub fn alpha(&self) -> f32 {
        1.0 - self.transparency
    }

    /// Reads every material of an `.mtl` file
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<Material>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TartanError::FileNotFound(path.to_path_buf()));
        }
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse_reader(&mut reader)
    }

    /// Reads every material from an MTL stream
    pub fn parse_reader<R: BufRead>(reader: &mut R) -> Result<Vec<Material>> {
        let (materials, _) = tobj::load_mtl_buf(reader)?;
        Ok(materials.iter().map(Material::from).collect())
    }

    /// Writes `materials` to an `.mtl` file
    pub fn save(path: impl AsRef<Path>, materials: &[Material]) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_mtl(&mut writer, materials)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_mtl<W: Write>(writer: &mut W, materials: &[Material]) -> Result<()> {
        for (i, material) in materials.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            let phong = &material.phong;
            writeln!(writer, "newmtl {}", material.name)?;
            writeln!(writer, "Ns {}", phong.shininess)?;
            writeln!(writer, "Ka {} {} {}", phong.ambient[0], phong.ambient[1], phong.ambient[2])?;
            writeln!(writer, "Kd {} {} {}", phong.diffuse[0], phong.diffuse[1], phong.diffuse[2])?;
            writeln!(writer, "Ks {} {} {}", phong.specular[0], phong.specular[1], phong.specular[2])?;
            writeln!(writer, "d {}", material.alpha())?;
        }
        Ok(())
    }
}

impl From<&tobj::Material> for Material {
    fn from(mtl: &tobj::Material) -> Self {
        let defaults = PhongModel::default();
        let phong = PhongModel::new(
            mtl.ambient.unwrap_or(defaults.ambient),
            mtl.diffuse.unwrap_or(defaults.diffuse),
            mtl.specular.unwrap_or(defaults.specular),
            mtl.shininess.unwrap_or(defaults.shininess),
        );

        // `Tr` is the inverse of `d`; tobj keeps it as an unknown parameter
        let transparency = mtl
            .unknown_param
            .get("Tr")
            .and_then(|value| value.trim().parse::<f32>().ok())
            .or_else(|| mtl.dissolve.map(|d| 1.0 - d))
            .unwrap_or(0.0);

        let name = if mtl.name.is_empty() {
            Material::default().name
        } else {
            mtl.name.clone()
        };

        Material::new(&name, phong, transparency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_phong_defaults() {
        let phong = PhongModel::default();
        assert_eq!(phong.ambient, [1.0, 1.0, 1.0]);
        assert_eq!(phong.diffuse, [1.0, 1.0, 1.0]);
        assert_eq!(phong.specular, [0.5, 0.5, 0.5]);
        assert_eq!(phong.shininess(), 64.0);
    }

    #[test]
    fn test_clamping() {
        let mut phong = PhongModel::default();
        phong.set_shininess(5000.0);
        assert_eq!(phong.shininess(), 1000.0);
        phong.set_shininess(-1.0);
        assert_eq!(phong.shininess(), 0.0);

        let material = Material::default().with_transparency(1.5);
        assert_eq!(material.transparency(), 1.0);
        assert_eq!(Material::default().with_transparency(-0.5).transparency(), 0.0);
        assert_eq!(Material::default().name, "Material");
    }

    #[test]
    fn test_parse_mtl() {
        let source = "\
# two materials
newmtl Red
Ns 250
Ka 0.1 0.0 0.0
Kd 0.8 0.0 0.0
Ks 0.5 0.5 0.5
d 0.75

newmtl Glass
Kd 0.9 0.9 1.0
Tr 0.6
";
        let materials = Material::parse_reader(&mut Cursor::new(source)).expect("valid mtl");
        assert_eq!(materials.len(), 2);

        let red = &materials[0];
        assert_eq!(red.name, "Red");
        assert_eq!(red.phong.shininess(), 250.0);
        assert_eq!(red.phong.diffuse, [0.8, 0.0, 0.0]);
        assert!((red.transparency() - 0.25).abs() < 1e-6);

        let glass = &materials[1];
        assert_eq!(glass.phong.ambient, [1.0, 1.0, 1.0]);
        assert!((glass.transparency() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_written_mtl_parses_back() {
        let materials = vec![
            Material::default().with_name("Blue").with_color(0.0, 0.0, 1.0),
            Material::default().with_name("Ghost").with_transparency(0.5),
        ];
        let mut out = Vec::new();
        Material::write_mtl(&mut out, &materials).expect("write");

        let parsed = Material::parse_reader(&mut Cursor::new(out)).expect("parse");
        assert_eq!(parsed, materials);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = Material::parse("/definitely/not/here.mtl");
        assert!(matches!(result, Err(TartanError::FileNotFound(_))));
    }
}
