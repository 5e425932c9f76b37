use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use cgmath::{Matrix4, SquareMatrix};

use crate::error::{Result, TartanError};
use crate::gfx::resources::material::Material;
use crate::gfx::resources::obj_file::{write_obj, ObjFile, ObjFileData};

use super::behaviour::Behaviour;
use super::complex_model::ComplexModel;
use super::model_unit::ModelUnit;

/// A complex model that can be loaded from disk and animated
///
/// Dereferences to [`ComplexModel`] for unit management and transforms.
#[derive(Debug, Default)]
pub struct Model {
    complex: ComplexModel,
    behaviour: Option<Behaviour>,
}

impl Deref for Model {
    type Target = ComplexModel;

    fn deref(&self) -> &ComplexModel {
        &self.complex
    }
}

impl DerefMut for Model {
    fn deref_mut(&mut self) -> &mut ComplexModel {
        &mut self.complex
    }
}

impl From<ComplexModel> for Model {
    fn from(complex: ComplexModel) -> Self {
        Self {
            complex,
            behaviour: None,
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_unit(unit: &ModelUnit) -> Self {
        ComplexModel::from_unit(unit).into()
    }

    pub fn from_units(units: &[ModelUnit]) -> Self {
        ComplexModel::from_units(units).into()
    }

    /// Builder pattern: Attach a behaviour
    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = Some(behaviour);
        self
    }

    pub fn set_behaviour(&mut self, behaviour: Option<Behaviour>) {
        self.behaviour = behaviour;
    }

    pub fn behaviour(&self) -> Option<&Behaviour> {
        self.behaviour.as_ref()
    }

    pub fn into_complex(self) -> ComplexModel {
        self.complex
    }

    /// Advances the behaviour, if any
    pub fn update(&mut self, delta_time: f32) {
        if let Some(behaviour) = self.behaviour.as_mut() {
            behaviour.update(delta_time);
        }
    }

    /// Matrix applied on top of every unit's own transform
    pub fn behaviour_matrix(&self) -> Matrix4<f32> {
        self.behaviour
            .as_ref()
            .map_or_else(Matrix4::identity, Behaviour::matrix)
    }

    /// Loads an `.obj` file and its material library.
    ///
    /// Every OBJ object becomes one unit with the material its `usemtl` names.
    pub fn parse(path: impl AsRef<Path>) -> Result<Model> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TartanError::FileNotFound(path.to_path_buf()));
        }
        if !has_extension(path, "obj") {
            return Err(TartanError::WrongExtension {
                path: path.to_path_buf(),
                expected: "obj",
            });
        }

        let obj = ObjFile::parse(path)?;
        let mtl_path = path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&obj.material_library);
        let materials = Material::parse(&mtl_path)?;

        let units = obj
            .objects
            .iter()
            .map(|object| {
                let material = materials
                    .iter()
                    .find(|material| material.name == object.material_name)
                    .ok_or_else(|| TartanError::UnknownMaterial {
                        object: object.name.clone(),
                        material: object.material_name.clone(),
                    })?;
                Ok(ModelUnit::from_obj(object, material.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Loaded model {} ({} units, {} materials)",
            path.display(),
            units.len(),
            materials.len()
        );
        Ok(Model::from_units(&units))
    }

    /// Writes the model to `<path>.obj` and its materials to `<path>.mtl`.
    ///
    /// Unit transforms are baked into the written geometry. Materials are
    /// written once per name.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let obj_path = path.as_ref().with_extension("obj");
        let mtl_path: PathBuf = obj_path.with_extension("mtl");
        let mtl_name = mtl_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let objects: Vec<ObjFileData> = self.units().iter().map(ModelUnit::to_obj_data).collect();

        let mut seen = HashSet::new();
        let materials: Vec<Material> = self
            .units()
            .iter()
            .filter(|unit| seen.insert(unit.material.name.clone()))
            .map(|unit| unit.material.clone())
            .collect();

        let mut writer = BufWriter::new(File::create(&obj_path)?);
        write_obj(&mut writer, &mtl_name, &objects)?;
        writer.flush()?;
        Material::save(&mtl_path, &materials)?;

        log::info!("Saved model to {}", obj_path.display());
        Ok(())
    }
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::RotationAngles;
    use cgmath::Vector3;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tartan-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    const OBJ: &str = "\
mtllib pair.mtl
o Left
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
usemtl Red
f 1//1 2//1 3//1
o Right
v 2 0 0
v 3 0 0
v 2 1 0
usemtl Blue
f 4 5 6
";

    const MTL: &str = "\
newmtl Red
Kd 1 0 0

newmtl Blue
Kd 0 0 1
";

    #[test]
    fn test_parse_pairs_objects_with_materials() {
        let dir = scratch_dir("parse");
        fs::write(dir.join("pair.obj"), OBJ).unwrap();
        fs::write(dir.join("pair.mtl"), MTL).unwrap();

        let model = Model::parse(dir.join("pair.obj")).expect("valid model");
        assert_eq!(model.len(), 2);
        assert_eq!(model.units()[0].name, "Left");
        assert_eq!(model.units()[0].material.phong.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(model.units()[1].material.name, "Blue");
        assert_eq!(model.units()[1].mesh().vertices()[0].position, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_rejects_unknown_material() {
        let dir = scratch_dir("unknown");
        fs::write(dir.join("pair.obj"), OBJ).unwrap();
        fs::write(dir.join("pair.mtl"), "newmtl Red\nKd 1 0 0\n").unwrap();

        match Model::parse(dir.join("pair.obj")) {
            Err(TartanError::UnknownMaterial { object, material }) => {
                assert_eq!(object, "Right");
                assert_eq!(material, "Blue");
            }
            other => panic!("unexpected result: {:?}", other.map(|m| m.len())),
        }
    }

    #[test]
    fn test_parse_checks_path() {
        let missing = Model::parse("/no/such/model.obj");
        assert!(matches!(missing, Err(TartanError::FileNotFound(_))));

        let dir = scratch_dir("extension");
        let wrong = dir.join("model.txt");
        fs::write(&wrong, OBJ).unwrap();
        assert!(matches!(
            Model::parse(&wrong),
            Err(TartanError::WrongExtension { expected: "obj", .. })
        ));
    }

    #[test]
    fn test_save_then_parse() {
        let dir = scratch_dir("save");
        let mut cube = Model::cube();
        cube.move_by(Vector3::new(0.0, 1.0, 0.0));
        cube.save(dir.join("cube")).expect("save");

        assert!(dir.join("cube.mtl").exists());
        let loaded = Model::parse(dir.join("cube.obj")).expect("reload");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.units()[0].name, "Cube");
        assert_eq!(
            loaded.units()[0].mesh().indices().len(),
            cube.units()[0].mesh().indices().len()
        );
        let min_y = loaded.units()[0]
            .mesh()
            .vertices()
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MAX, f32::min);
        assert!((min_y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_update_drives_behaviour_matrix() {
        let mut model = Model::cube();
        assert_eq!(model.behaviour_matrix(), Matrix4::identity());

        model.update(1.0);
        assert_eq!(model.behaviour_matrix(), Matrix4::identity());

        let mut model = model.with_behaviour(Behaviour::preset_rotate(RotationAngles::new(0.0, 1.0, 0.0)));
        model.update(0.25);
        let angles = model.behaviour().map(Behaviour::rotation_angles);
        assert_eq!(angles, Some(RotationAngles::new(0.0, 0.25, 0.0)));
        assert_ne!(model.behaviour_matrix(), Matrix4::identity());
    }
}
