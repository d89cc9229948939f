//! MTL (Material Template Library) file parser
//!
//! Parses the subset of Wavefront .mtl used for albedo materials: diffuse
//! color, dissolve, and the diffuse texture map.

use crate::foundation::math::Vec3;

/// Parsed MTL material data
#[derive(Debug, Clone)]
pub struct MtlData {
    /// Material name
    pub name: String,
    /// Diffuse color (Kd) - becomes the albedo RGB
    pub diffuse: Vec3,
    /// Dissolve/opacity (d) - 0.0 = transparent, 1.0 = opaque
    pub dissolve: f32,
    /// Diffuse texture map (map_Kd)
    pub diffuse_map: Option<String>,
}

impl Default for MtlData {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            dissolve: 1.0,
            diffuse_map: None,
        }
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents into materials in file order
    pub fn parse(contents: &str) -> Result<Vec<MtlData>, String> {
        let mut materials = Vec::new();
        let mut current_material: Option<MtlData> = None;

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let command = match tokens.next() {
                Some(cmd) => cmd,
                None => continue,
            };

            match command {
                "newmtl" => {
                    if let Some(mat) = current_material.take() {
                        materials.push(mat);
                    }

                    let name = tokens
                        .next()
                        .ok_or_else(|| {
                            format!("Line {}: newmtl missing material name", line_num + 1)
                        })?
                        .to_string();
                    current_material = Some(MtlData {
                        name,
                        ..Default::default()
                    });
                }

                "Kd" => {
                    if let Some(ref mut mat) = current_material {
                        mat.diffuse = Self::parse_vec3(&mut tokens, line_num, "Kd")?;
                    }
                }

                "d" => {
                    if let Some(ref mut mat) = current_material {
                        mat.dissolve = Self::parse_f32(&mut tokens, line_num, "d")?;
                    }
                }

                "Tr" => {
                    // Transparency (inverted dissolve): Tr = 1.0 - d
                    if let Some(ref mut mat) = current_material {
                        let transparency = Self::parse_f32(&mut tokens, line_num, "Tr")?;
                        mat.dissolve = 1.0 - transparency;
                    }
                }

                "map_Kd" => {
                    if let Some(ref mut mat) = current_material {
                        mat.diffuse_map =
                            Some(Self::parse_texture_path(&mut tokens, line_num, "map_Kd")?);
                    }
                }

                // Ignore unknown commands silently
                _ => {}
            }
        }

        if let Some(mat) = current_material {
            materials.push(mat);
        }

        Ok(materials)
    }

    /// Parse a Vec3 color from RGB tokens
    fn parse_vec3<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<Vec3, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let r = Self::parse_f32(tokens, line_num, command)?;
        let g = Self::parse_f32(tokens, line_num, command)?;
        let b = Self::parse_f32(tokens, line_num, command)?;
        Ok(Vec3::new(r, g, b))
    }

    /// Parse a single f32 value
    fn parse_f32<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<f32, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let token = tokens
            .next()
            .ok_or_else(|| format!("Line {}: {} missing value", line_num + 1, command))?;
        token.parse::<f32>().map_err(|_| {
            format!(
                "Line {}: {} invalid float value '{}'",
                line_num + 1,
                command,
                token
            )
        })
    }

    /// Parse texture file path (may contain spaces, take rest of line)
    fn parse_texture_path<'a, I>(
        tokens: &mut I,
        line_num: usize,
        command: &str,
    ) -> Result<String, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let path: Vec<&str> = tokens.collect();
        if path.is_empty() {
            return Err(format!(
                "Line {}: {} missing texture path",
                line_num + 1,
                command
            ));
        }
        Ok(path.join(" "))
    }
}
