use cgmath::{Matrix4, SquareMatrix};
use winit::event::{DeviceEvent, WindowEvent};

use crate::error::{Result, TartanError};
use crate::gfx::camera::{Camera, CameraController};
use crate::gfx::light::LightSource;
use crate::gfx::model::{ComplexModel, Model};
use crate::gfx::rendering::shader::{ShaderKind, MAX_LIGHT_SOURCES};
use crate::settings::SceneSettings;

macro_rules! scene_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);
    };
}

scene_id!(ModelId);
scene_id!(LightId);
scene_id!(CameraId);

/// A complex model to draw and the matrix applied on top of its units
pub struct DrawItem<'a> {
    pub model: &'a mut ComplexModel,
    pub parent: Matrix4<f32>,
}

/// Models, light sources and cameras, with one camera current
pub struct Scene {
    models: Vec<(ModelId, Model)>,
    lights: Vec<(LightId, LightSource)>,
    cameras: Vec<(CameraId, Camera)>,
    /// Index into `cameras`; the current camera can't be removed
    current: usize,
    next_id: u64,
    controller: CameraController,
    pub background: [f32; 4],
}

impl Scene {
    /// Creates a scene with `camera` as its only and current camera
    pub fn new(camera: Camera) -> Self {
        let mut scene = Self {
            models: Vec::new(),
            lights: Vec::new(),
            cameras: Vec::new(),
            current: 0,
            next_id: 0,
            controller: CameraController::default(),
            background: SceneSettings::DEFAULT_BACKGROUND,
        };
        let id = CameraId(scene.allocate_id());
        scene.cameras.push((id, camera));
        scene.apply_shaders();
        scene
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // Models

    pub fn add_model(&mut self, mut model: Model) -> ModelId {
        let id = ModelId(self.allocate_id());
        model.set_shader(self.model_shader());
        log::debug!("Added model {:?} with {} units", id, model.len());
        self.models.push((id, model));
        id
    }

    pub fn remove_model(&mut self, id: ModelId) -> Result<Model> {
        let index = self
            .models
            .iter()
            .position(|(model_id, _)| *model_id == id)
            .ok_or(TartanError::NotInScene("Model"))?;
        Ok(self.models.remove(index).1)
    }

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        find(&self.models, id)
    }

    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        find_mut(&mut self.models, id)
    }

    pub fn models(&self) -> impl Iterator<Item = (ModelId, &Model)> {
        self.models.iter().map(|(id, model)| (*id, model))
    }

    // Light sources

    pub fn add_light_source(&mut self, mut light: LightSource) -> Result<LightId> {
        if self.lights.len() >= MAX_LIGHT_SOURCES {
            return Err(TartanError::TooManyLightSources {
                max: MAX_LIGHT_SOURCES,
            });
        }
        let id = LightId(self.allocate_id());
        light.set_shader(ShaderKind::Unlighted);
        self.lights.push((id, light));
        Ok(id)
    }

    pub fn remove_light_source(&mut self, id: LightId) -> Result<LightSource> {
        let index = self
            .lights
            .iter()
            .position(|(light_id, _)| *light_id == id)
            .ok_or(TartanError::NotInScene("Light source"))?;
        Ok(self.lights.remove(index).1)
    }

    pub fn light_source(&self, id: LightId) -> Option<&LightSource> {
        find(&self.lights, id)
    }

    pub fn light_source_mut(&mut self, id: LightId) -> Option<&mut LightSource> {
        find_mut(&mut self.lights, id)
    }

    /// Light sources in insertion order, as handed to the lighting dispatch
    pub fn light_sources(&self) -> Vec<&LightSource> {
        self.lights.iter().map(|(_, light)| light).collect()
    }

    // Cameras

    pub fn add_camera(&mut self, mut camera: Camera) -> CameraId {
        let id = CameraId(self.allocate_id());
        camera.figure_mut().set_shader(ShaderKind::Unlighted);
        self.cameras.push((id, camera));
        id
    }

    pub fn remove_camera(&mut self, id: CameraId) -> Result<Camera> {
        let index = self
            .cameras
            .iter()
            .position(|(camera_id, _)| *camera_id == id)
            .ok_or(TartanError::NotInScene("Camera"))?;
        if index == self.current {
            return Err(TartanError::CameraInUse);
        }
        if index < self.current {
            self.current -= 1;
        }
        Ok(self.cameras.remove(index).1)
    }

    /// Makes `id` the current camera and reassigns shader programs
    pub fn set_camera(&mut self, id: CameraId) -> Result<()> {
        let index = self
            .cameras
            .iter()
            .position(|(camera_id, _)| *camera_id == id)
            .ok_or(TartanError::NotInScene("Camera"))?;
        self.current = index;
        log::info!("Switched to camera {:?}", id);
        self.apply_shaders();
        Ok(())
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        find(&self.cameras, id)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        find_mut(&mut self.cameras, id)
    }

    pub fn current_camera_id(&self) -> CameraId {
        self.cameras[self.current].0
    }

    pub fn current_camera(&self) -> &Camera {
        &self.cameras[self.current].1
    }

    pub fn current_camera_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.current].1
    }

    pub fn cameras(&self) -> impl Iterator<Item = (CameraId, &Camera)> {
        self.cameras.iter().map(|(id, camera)| (*id, camera))
    }

    fn model_shader(&self) -> ShaderKind {
        if self.current_camera().is_two_d() {
            ShaderKind::Unlighted
        } else {
            ShaderKind::Lighted
        }
    }

    fn apply_shaders(&mut self) {
        let model_shader = self.model_shader();
        for (_, model) in &mut self.models {
            model.set_shader(model_shader);
        }
        for (_, light) in &mut self.lights {
            light.set_shader(ShaderKind::Unlighted);
        }
        for (_, camera) in &mut self.cameras {
            camera.figure_mut().set_shader(ShaderKind::Unlighted);
        }
    }

    // Frame

    /// Advances model behaviours and the current camera
    pub fn update(&mut self, delta_time: f32) {
        for (_, model) in &mut self.models {
            model.update(delta_time);
        }
        self.current_camera_mut().update(delta_time);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect_ratio = width as f32 / height as f32;
        for (_, camera) in &mut self.cameras {
            camera.set_aspect_ratio(aspect_ratio);
        }
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let camera = &mut self.cameras[self.current].1;
        self.controller.process_window_events(event, camera)
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        let camera = &mut self.cameras[self.current].1;
        self.controller.process_events(event, camera)
    }

    /// Everything to draw this frame: other cameras' figures, then models,
    /// then light source figures
    pub fn draw_items(&mut self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();

        for (index, (_, camera)) in self.cameras.iter_mut().enumerate() {
            if index == self.current {
                continue;
            }
            let parent = camera.figure_matrix();
            items.push(DrawItem {
                model: camera.figure_mut(),
                parent,
            });
        }

        for (_, model) in &mut self.models {
            let parent = model.behaviour_matrix();
            items.push(DrawItem {
                model: &mut **model,
                parent,
            });
        }

        for (_, light) in &mut self.lights {
            items.push(DrawItem {
                model: light.figure_mut(),
                parent: Matrix4::identity(),
            });
        }

        items
    }
}

fn find<I: PartialEq, T>(items: &[(I, T)], id: I) -> Option<&T> {
    items
        .iter()
        .find(|(item_id, _)| *item_id == id)
        .map(|(_, item)| item)
}

fn find_mut<I: PartialEq, T>(items: &mut [(I, T)], id: I) -> Option<&mut T> {
    items
        .iter_mut()
        .find(|(item_id, _)| *item_id == id)
        .map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraSettings;
    use crate::gfx::geometry::RotationAngles;
    use crate::gfx::model::Behaviour;
    use cgmath::Vector3;

    fn two_d_camera() -> Camera {
        Camera::two_d(
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 0.0),
            CameraSettings::default(),
        )
    }

    #[test]
    fn test_new_scene_has_current_camera() {
        let scene = Scene::new(Camera::default());
        assert_eq!(scene.cameras().count(), 1);
        assert_eq!(scene.background, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(scene.current_camera().position(), Camera::default().position());
    }

    #[test]
    fn test_light_source_limit() {
        let mut scene = Scene::new(Camera::default());
        for _ in 0..MAX_LIGHT_SOURCES {
            scene.add_light_source(LightSource::default()).unwrap();
        }
        let err = scene.add_light_source(LightSource::default()).unwrap_err();
        assert!(matches!(err, TartanError::TooManyLightSources { max: 32 }));
        assert_eq!(scene.light_sources().len(), MAX_LIGHT_SOURCES);
    }

    #[test]
    fn test_remove_unknown_is_not_in_scene() {
        let mut scene = Scene::new(Camera::default());
        let id = scene.add_model(Model::cube());
        scene.remove_model(id).unwrap();
        assert!(matches!(
            scene.remove_model(id),
            Err(TartanError::NotInScene("Model"))
        ));

        let light = scene.add_light_source(LightSource::default()).unwrap();
        scene.remove_light_source(light).unwrap();
        assert!(scene.remove_light_source(light).is_err());
    }

    #[test]
    fn test_current_camera_cannot_be_removed() {
        let mut scene = Scene::new(Camera::default());
        let first = scene.current_camera_id();
        let second = scene.add_camera(two_d_camera());

        assert!(matches!(scene.remove_camera(first), Err(TartanError::CameraInUse)));
        scene.set_camera(second).unwrap();
        scene.remove_camera(first).unwrap();
        assert_eq!(scene.current_camera_id(), second);
        assert!(scene.current_camera().is_two_d());
        assert!(matches!(
            scene.set_camera(first),
            Err(TartanError::NotInScene("Camera"))
        ));
    }

    #[test]
    fn test_camera_change_reassigns_shaders() {
        let mut scene = Scene::new(Camera::default());
        let cube = scene.add_model(Model::cube());
        let light = scene.add_light_source(LightSource::point(Vector3::unit_y())).unwrap();
        let first = scene.current_camera_id();
        let flat = scene.add_camera(two_d_camera());

        assert_eq!(scene.model(cube).unwrap().shader(), ShaderKind::Lighted);
        assert_eq!(scene.light_source(light).unwrap().shader(), ShaderKind::Unlighted);

        scene.set_camera(flat).unwrap();
        assert_eq!(scene.model(cube).unwrap().shader(), ShaderKind::Unlighted);
        let late = scene.add_model(Model::sphere());
        assert_eq!(scene.model(late).unwrap().shader(), ShaderKind::Unlighted);

        scene.set_camera(first).unwrap();
        assert_eq!(scene.model(cube).unwrap().shader(), ShaderKind::Lighted);
        assert_eq!(scene.camera(flat).unwrap().figure().shader(), ShaderKind::Unlighted);
    }

    #[test]
    fn test_draw_order_skips_current_camera() {
        let mut scene = Scene::new(Camera::default());
        scene.add_camera(two_d_camera());
        scene.add_model(Model::cube());
        scene.add_model(Model::sphere());
        scene.add_light_source(LightSource::point(Vector3::unit_x())).unwrap();

        let items = scene.draw_items();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].model.shader(), ShaderKind::Unlighted);
        assert_eq!(items[1].model.units()[0].name, "Cube");
        assert_eq!(items[2].model.units()[0].name, "Sphere");
        assert_eq!(items[3].model.units()[0].name, "Light");
    }

    #[test]
    fn test_update_advances_behaviours() {
        let mut scene = Scene::new(Camera::default());
        let id = scene.add_model(
            Model::cube().with_behaviour(Behaviour::preset_rotate(RotationAngles::from_degrees(
                0.0, 90.0, 0.0,
            ))),
        );
        assert_eq!(scene.model(id).unwrap().behaviour_matrix(), Matrix4::identity());
        scene.update(0.5);
        assert_ne!(scene.model(id).unwrap().behaviour_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_resize_sets_every_aspect_ratio() {
        let mut scene = Scene::new(Camera::default());
        let other = scene.add_camera(two_d_camera());
        scene.resize(800, 400);
        assert_eq!(scene.current_camera().settings().aspect_ratio, 2.0);
        assert_eq!(scene.camera(other).unwrap().settings().aspect_ratio, 2.0);

        scene.resize(0, 400);
        assert_eq!(scene.current_camera().settings().aspect_ratio, 2.0);
    }
}
