use crate::math::hex_to_linear;

/// Surface description shared by reference across meshes
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// 0xRRGGBB
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub double_sided: bool,
    /// Ignores lights and outputs its flat color
    pub unlit: bool,
}

impl Material {
    /// Lit physically-based material
    pub fn standard(name: &str, color: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            color,
            metalness,
            roughness,
            opacity: 1.0,
            double_sided: false,
            unlit: false,
        }
    }

    /// Flat colored material unaffected by lighting
    pub fn basic(name: &str, color: u32) -> Self {
        Self {
            unlit: true,
            ..Self::standard(name, color, 0.0, 1.0)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Linear RGBA for the shader
    pub fn linear_rgba(&self) -> [f32; 4] {
        let [r, g, b] = hex_to_linear(self.color);
        [r, g, b, self.opacity]
    }
}

/// Index of a material inside its library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

/// Append-only material table; entries live as long as the library
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_hands_out_sequential_ids() {
        let mut library = MaterialLibrary::new();
        let body = library.add(Material::standard("body", 0xffffff, 0.1, 0.8));
        let led = library.add(Material::basic("led", 0xffaaff));
        assert_ne!(body, led);
        assert_eq!(library.len(), 2);
        assert_eq!(library.get(body).unwrap().name, "body");
        assert!(library.get(led).unwrap().unlit);
    }

    #[test]
    fn test_transparency() {
        let ramp = Material::standard("ramp", 0x66bb66, 0.1, 0.7)
            .with_opacity(0.8)
            .double_sided();
        assert!(ramp.is_transparent());
        assert!(ramp.double_sided);
        assert_eq!(ramp.linear_rgba()[3], 0.8);
        assert!(!Material::standard("pod", 0x444444, 0.2, 0.5).is_transparent());
    }
}
