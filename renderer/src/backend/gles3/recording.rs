//! A function table which records every call instead of talking to a driver.
//!
//! Lets the whole OpenGL ES 3 backend run headless: object names are handed
//! out sequentially, buffer storage lives in CPU memory so mapping works, and
//! extensions and limits are configurable.
//!
//! # Example
//!
//! ```ignore
//! let gl = Arc::new(RecordingFunctions::new().with_extensions(&["GL_EXT_base_instance"]));
//! let mut renderer = Gles3Renderer::with_functions(Context::new(), gl.clone());
//! renderer.submit_command_buffer(&command_buffer);
//! assert_eq!(gl.count("draw_arrays_instanced_base_instance"), 1);
//! ```

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use super::functions::*;

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct GlCall {
    /// Name of the [`GlFunctions`] method.
    pub name: &'static str,
    /// Integer arguments, in parameter order.
    pub arguments: Vec<i64>,
    /// Float arguments, in parameter order.
    pub floats: Vec<f32>,
    /// String argument, if any.
    pub text: Option<String>,
}

#[derive(Default)]
struct RecordingState {
    calls: Vec<GlCall>,
    extensions: Vec<String>,
    parameters: HashMap<u32, i32>,
    strings: HashMap<u32, String>,
    next_name: u32,
    enabled: HashSet<u32>,
    bound_buffers: HashMap<u32, u32>,
    buffer_storage: HashMap<u32, Box<[u8]>>,
    uniform_locations: HashMap<(u32, String), i32>,
    missing_uniforms: HashSet<String>,
    compile_status: bool,
    link_status: bool,
    framebuffer_status: u32,
    drawable_size: Option<(u32, u32)>,
}

/// Call-recording [`GlFunctions`] implementation.
pub struct RecordingFunctions {
    state: Mutex<RecordingState>,
}

impl RecordingFunctions {
    /// A device without extensions and with modest limits.
    pub fn new() -> Self {
        let parameters = HashMap::from([
            (glow::MAX_DRAW_BUFFERS, 4),
            (glow::MAX_TEXTURE_SIZE, 4096),
            (glow::MAX_ARRAY_TEXTURE_LAYERS, 256),
            (glow::MAX_UNIFORM_BLOCK_SIZE, 16384),
            (glow::MAX_SAMPLES, 4),
        ]);
        let strings = HashMap::from([
            (glow::RENDERER, "Recording".to_owned()),
            (glow::VERSION, "OpenGL ES 3.0 Recording".to_owned()),
        ]);
        Self {
            state: Mutex::new(RecordingState {
                parameters,
                strings,
                next_name: 1,
                compile_status: true,
                link_status: true,
                framebuffer_status: glow::FRAMEBUFFER_COMPLETE,
                ..RecordingState::default()
            }),
        }
    }

    /// Report the given extensions.
    pub fn with_extensions(self, extensions: &[&str]) -> Self {
        self.state.lock().extensions = extensions.iter().map(|name| (*name).to_owned()).collect();
        self
    }

    /// Answer `glGetIntegerv(parameter)` with `value`.
    pub fn with_parameter(self, parameter: u32, value: i32) -> Self {
        self.state.lock().parameters.insert(parameter, value);
        self
    }

    /// Report `name` as an inactive uniform in every program.
    pub fn with_missing_uniform(self, name: &str) -> Self {
        self.state.lock().missing_uniforms.insert(name.to_owned());
        self
    }

    /// Size of the surface behind the default framebuffer.
    pub fn with_drawable_size(self, width: u32, height: u32) -> Self {
        self.set_drawable_size(width, height);
        self
    }

    /// Resize the surface behind the default framebuffer.
    pub fn set_drawable_size(&self, width: u32, height: u32) {
        self.state.lock().drawable_size = Some((width, height));
    }

    /// Result of following shader compilations.
    pub fn set_compile_status(&self, status: bool) {
        self.state.lock().compile_status = status;
    }

    /// Result of following program links.
    pub fn set_link_status(&self, status: bool) {
        self.state.lock().link_status = status;
    }

    /// Result of following framebuffer completeness checks.
    pub fn set_framebuffer_status(&self, status: u32) {
        self.state.lock().framebuffer_status = status;
    }

    /// Every call recorded so far.
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.lock().calls.clone()
    }

    /// Recorded calls of one method.
    pub fn calls_named(&self, name: &str) -> Vec<GlCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.name == name)
            .cloned()
            .collect()
    }

    /// Number of recorded calls of one method.
    pub fn count(&self, name: &str) -> usize {
        self.state.lock().calls.iter().filter(|call| call.name == name).count()
    }

    /// Names of every recorded call, in order.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.state.lock().calls.iter().map(|call| call.name).collect()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn push(&self, name: &'static str, arguments: Vec<i64>, floats: Vec<f32>, text: Option<String>) {
        self.state.lock().calls.push(GlCall {
            name,
            arguments,
            floats,
            text,
        });
    }

    fn record(&self, name: &'static str, arguments: &[i64]) {
        self.push(name, arguments.to_vec(), Vec::new(), None);
    }

    fn record_floats(&self, name: &'static str, arguments: &[i64], floats: &[f32]) {
        self.push(name, arguments.to_vec(), floats.to_vec(), None);
    }

    fn record_text(&self, name: &'static str, arguments: &[i64], text: &str) {
        self.push(name, arguments.to_vec(), Vec::new(), Some(text.to_owned()));
    }

    fn create(&self, name: &'static str, arguments: &[i64]) -> u32 {
        let object = {
            let mut state = self.state.lock();
            let object = state.next_name;
            state.next_name += 1;
            object
        };
        let mut arguments = arguments.to_vec();
        arguments.push(i64::from(object));
        self.push(name, arguments, Vec::new(), None);
        object
    }
}

impl Default for RecordingFunctions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordingFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RecordingFunctions")
            .field("calls", &state.calls.len())
            .field("extensions", &state.extensions)
            .finish_non_exhaustive()
    }
}

fn flag(value: bool) -> i64 {
    i64::from(value)
}

impl GlFunctions for RecordingFunctions {
    fn get_string(&self, name: u32) -> String {
        self.state.lock().strings.get(&name).cloned().unwrap_or_default()
    }

    fn get_integer(&self, parameter: u32) -> i32 {
        self.state.lock().parameters.get(&parameter).copied().unwrap_or(0)
    }

    fn extensions(&self) -> Vec<String> {
        self.state.lock().extensions.clone()
    }

    fn current_drawable_size(&self) -> Option<(u32, u32)> {
        self.state.lock().drawable_size
    }

    fn get_error(&self) -> u32 {
        glow::NO_ERROR
    }

    fn flush(&self) {
        self.record("flush", &[]);
    }

    fn finish(&self) {
        self.record("finish", &[]);
    }

    fn enable(&self, capability: u32) {
        self.state.lock().enabled.insert(capability);
        self.record("enable", &[i64::from(capability)]);
    }

    fn disable(&self, capability: u32) {
        self.state.lock().enabled.remove(&capability);
        self.record("disable", &[i64::from(capability)]);
    }

    fn is_enabled(&self, capability: u32) -> bool {
        self.state.lock().enabled.contains(&capability)
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record("viewport", &[x.into(), y.into(), width.into(), height.into()]);
    }

    fn depth_range(&self, near: f32, far: f32) {
        self.record_floats("depth_range", &[], &[near, far]);
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record("scissor", &[x.into(), y.into(), width.into(), height.into()]);
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record_floats("clear_color", &[], &[red, green, blue, alpha]);
    }

    fn clear_depth(&self, depth: f32) {
        self.record_floats("clear_depth", &[], &[depth]);
    }

    fn clear_stencil(&self, stencil: i32) {
        self.record("clear_stencil", &[stencil.into()]);
    }

    fn clear(&self, mask: u32) {
        self.record("clear", &[mask.into()]);
    }

    fn depth_mask(&self, enabled: bool) {
        self.record("depth_mask", &[flag(enabled)]);
    }

    fn depth_func(&self, function: u32) {
        self.record("depth_func", &[function.into()]);
    }

    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.record("color_mask", &[flag(red), flag(green), flag(blue), flag(alpha)]);
    }

    fn cull_face(&self, mode: u32) {
        self.record("cull_face", &[mode.into()]);
    }

    fn front_face(&self, mode: u32) {
        self.record("front_face", &[mode.into()]);
    }

    fn polygon_offset(&self, factor: f32, units: f32) {
        self.record_floats("polygon_offset", &[], &[factor, units]);
    }

    fn blend_func_separate(&self, source_rgb: u32, destination_rgb: u32, source_alpha: u32, destination_alpha: u32) {
        self.record(
            "blend_func_separate",
            &[source_rgb.into(), destination_rgb.into(), source_alpha.into(), destination_alpha.into()],
        );
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        self.record("blend_equation_separate", &[mode_rgb.into(), mode_alpha.into()]);
    }

    fn create_buffer(&self) -> u32 {
        self.create("create_buffer", &[])
    }

    fn delete_buffer(&self, buffer: u32) {
        self.state.lock().buffer_storage.remove(&buffer);
        self.record("delete_buffer", &[buffer.into()]);
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        self.state.lock().bound_buffers.insert(target, buffer);
        self.record("bind_buffer", &[target.into(), buffer.into()]);
    }

    fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32) {
        self.record("bind_buffer_base", &[target.into(), index.into(), buffer.into()]);
    }

    fn buffer_data(&self, target: u32, size: i32, data: Option<&[u8]>, usage: u32) {
        {
            let mut state = self.state.lock();
            if let Some(buffer) = state.bound_buffers.get(&target).copied() {
                let mut storage = vec![0u8; size.max(0) as usize].into_boxed_slice();
                if let Some(data) = data {
                    let length = data.len().min(storage.len());
                    storage[..length].copy_from_slice(&data[..length]);
                }
                state.buffer_storage.insert(buffer, storage);
            }
        }
        self.record(
            "buffer_data",
            &[target.into(), size.into(), flag(data.is_some()), usage.into()],
        );
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        self.record("buffer_sub_data", &[target.into(), offset.into(), data.len() as i64]);
    }

    fn map_buffer_range(&self, target: u32, offset: i32, length: i32, access: u32) -> *mut u8 {
        self.record(
            "map_buffer_range",
            &[target.into(), offset.into(), length.into(), access.into()],
        );
        let mut state = self.state.lock();
        let Some(buffer) = state.bound_buffers.get(&target).copied() else {
            return std::ptr::null_mut();
        };
        match state.buffer_storage.get_mut(&buffer) {
            Some(storage) if offset >= 0 && (offset + length) as usize <= storage.len() => {
                storage[offset as usize..].as_mut_ptr()
            }
            _ => std::ptr::null_mut(),
        }
    }

    fn unmap_buffer(&self, target: u32) {
        self.record("unmap_buffer", &[target.into()]);
    }

    fn create_vertex_array(&self) -> u32 {
        self.create("create_vertex_array", &[])
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record("delete_vertex_array", &[vertex_array.into()]);
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        self.record("bind_vertex_array", &[vertex_array.into()]);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record("enable_vertex_attrib_array", &[index.into()]);
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, data_type: u32, normalized: bool, stride: i32, offset: i32) {
        self.record(
            "vertex_attrib_pointer_f32",
            &[index.into(), size.into(), data_type.into(), flag(normalized), stride.into(), offset.into()],
        );
    }

    fn vertex_attrib_pointer_i32(&self, index: u32, size: i32, data_type: u32, stride: i32, offset: i32) {
        self.record(
            "vertex_attrib_pointer_i32",
            &[index.into(), size.into(), data_type.into(), stride.into(), offset.into()],
        );
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        self.record("vertex_attrib_divisor", &[index.into(), divisor.into()]);
    }

    fn create_texture(&self) -> u32 {
        self.create("create_texture", &[])
    }

    fn delete_texture(&self, texture: u32) {
        self.record("delete_texture", &[texture.into()]);
    }

    fn active_texture(&self, unit: u32) {
        self.record("active_texture", &[unit.into()]);
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        self.record("bind_texture", &[target.into(), texture.into()]);
    }

    fn tex_image_2d(&self, target: u32, level: i32, internal_format: i32, width: i32, height: i32, format: u32, data_type: u32, data: Option<&[u8]>) {
        self.record(
            "tex_image_2d",
            &[
                target.into(),
                level.into(),
                internal_format.into(),
                width.into(),
                height.into(),
                format.into(),
                data_type.into(),
                data.map_or(-1, |data| data.len() as i64),
            ],
        );
    }

    fn tex_image_3d(&self, target: u32, level: i32, internal_format: i32, width: i32, height: i32, depth: i32, format: u32, data_type: u32, data: Option<&[u8]>) {
        self.record(
            "tex_image_3d",
            &[
                target.into(),
                level.into(),
                internal_format.into(),
                width.into(),
                height.into(),
                depth.into(),
                format.into(),
                data_type.into(),
                data.map_or(-1, |data| data.len() as i64),
            ],
        );
    }

    fn compressed_tex_image_2d(&self, target: u32, level: i32, internal_format: u32, width: i32, height: i32, data: &[u8]) {
        self.record(
            "compressed_tex_image_2d",
            &[target.into(), level.into(), internal_format.into(), width.into(), height.into(), data.len() as i64],
        );
    }

    fn compressed_tex_image_3d(&self, target: u32, level: i32, internal_format: u32, width: i32, height: i32, depth: i32, data: &[u8]) {
        self.record(
            "compressed_tex_image_3d",
            &[
                target.into(),
                level.into(),
                internal_format.into(),
                width.into(),
                height.into(),
                depth.into(),
                data.len() as i64,
            ],
        );
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        self.record("tex_parameter_i32", &[target.into(), parameter.into(), value.into()]);
    }

    fn generate_mipmap(&self, target: u32) {
        self.record("generate_mipmap", &[target.into()]);
    }

    fn tex_buffer(&self, target: u32, internal_format: u32, buffer: u32) {
        self.record("tex_buffer", &[target.into(), internal_format.into(), buffer.into()]);
    }

    fn create_sampler(&self) -> u32 {
        self.create("create_sampler", &[])
    }

    fn delete_sampler(&self, sampler: u32) {
        self.record("delete_sampler", &[sampler.into()]);
    }

    fn bind_sampler(&self, unit: u32, sampler: u32) {
        self.record("bind_sampler", &[unit.into(), sampler.into()]);
    }

    fn sampler_parameter_i32(&self, sampler: u32, parameter: u32, value: i32) {
        self.record("sampler_parameter_i32", &[sampler.into(), parameter.into(), value.into()]);
    }

    fn sampler_parameter_f32(&self, sampler: u32, parameter: u32, value: f32) {
        self.record_floats("sampler_parameter_f32", &[sampler.into(), parameter.into()], &[value]);
    }

    fn sampler_parameter_f32_slice(&self, sampler: u32, parameter: u32, values: &[f32]) {
        self.record_floats("sampler_parameter_f32_slice", &[sampler.into(), parameter.into()], values);
    }

    fn create_framebuffer(&self) -> u32 {
        self.create("create_framebuffer", &[])
    }

    fn delete_framebuffer(&self, framebuffer: u32) {
        self.record("delete_framebuffer", &[framebuffer.into()]);
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: u32) {
        self.record("bind_framebuffer", &[target.into(), framebuffer.into()]);
    }

    fn framebuffer_texture_2d(&self, target: u32, attachment: u32, texture_target: u32, texture: u32, level: i32) {
        self.record(
            "framebuffer_texture_2d",
            &[target.into(), attachment.into(), texture_target.into(), texture.into(), level.into()],
        );
    }

    fn framebuffer_texture_layer(&self, target: u32, attachment: u32, texture: u32, level: i32, layer: i32) {
        self.record(
            "framebuffer_texture_layer",
            &[target.into(), attachment.into(), texture.into(), level.into(), layer.into()],
        );
    }

    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, renderbuffer: u32) {
        self.record("framebuffer_renderbuffer", &[target.into(), attachment.into(), renderbuffer.into()]);
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        self.record("check_framebuffer_status", &[target.into()]);
        self.state.lock().framebuffer_status
    }

    fn draw_buffers(&self, buffers: &[u32]) {
        let buffers: Vec<i64> = buffers.iter().map(|buffer| i64::from(*buffer)).collect();
        self.record("draw_buffers", &buffers);
    }

    fn blit_framebuffer(&self, source: [i32; 4], destination: [i32; 4], mask: u32, filter: u32) {
        let mut arguments: Vec<i64> = source.iter().chain(&destination).map(|value| i64::from(*value)).collect();
        arguments.push(mask.into());
        arguments.push(filter.into());
        self.record("blit_framebuffer", &arguments);
    }

    fn create_renderbuffer(&self) -> u32 {
        self.create("create_renderbuffer", &[])
    }

    fn delete_renderbuffer(&self, renderbuffer: u32) {
        self.record("delete_renderbuffer", &[renderbuffer.into()]);
    }

    fn bind_renderbuffer(&self, renderbuffer: u32) {
        self.record("bind_renderbuffer", &[renderbuffer.into()]);
    }

    fn renderbuffer_storage_multisample(&self, samples: i32, internal_format: u32, width: i32, height: i32) {
        self.record(
            "renderbuffer_storage_multisample",
            &[samples.into(), internal_format.into(), width.into(), height.into()],
        );
    }

    fn create_shader(&self, shader_type: u32) -> u32 {
        self.create("create_shader", &[shader_type.into()])
    }

    fn delete_shader(&self, shader: u32) {
        self.record("delete_shader", &[shader.into()]);
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.record_text("shader_source", &[shader.into()], source);
    }

    fn compile_shader(&self, shader: u32) {
        self.record("compile_shader", &[shader.into()]);
    }

    fn get_shader_compile_status(&self, _shader: u32) -> bool {
        self.state.lock().compile_status
    }

    fn get_shader_info_log(&self, shader: u32) -> String {
        format!("recorded shader {shader} failed to compile")
    }

    fn create_program(&self) -> u32 {
        self.create("create_program", &[])
    }

    fn delete_program(&self, program: u32) {
        self.record("delete_program", &[program.into()]);
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record("attach_shader", &[program.into(), shader.into()]);
    }

    fn bind_attrib_location(&self, program: u32, index: u32, name: &str) {
        self.record_text("bind_attrib_location", &[program.into(), index.into()], name);
    }

    fn link_program(&self, program: u32) {
        self.record("link_program", &[program.into()]);
    }

    fn get_program_link_status(&self, _program: u32) -> bool {
        self.state.lock().link_status
    }

    fn get_program_info_log(&self, program: u32) -> String {
        format!("recorded program {program} failed to link")
    }

    fn use_program(&self, program: u32) {
        self.record("use_program", &[program.into()]);
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> i32 {
        let mut state = self.state.lock();
        if state.missing_uniforms.contains(name) {
            return -1;
        }
        let next = state.uniform_locations.len() as i32;
        *state
            .uniform_locations
            .entry((program, name.to_owned()))
            .or_insert(next)
    }

    fn get_uniform_block_index(&self, program: u32, name: &str) -> u32 {
        if self.state.lock().missing_uniforms.contains(name) {
            return INVALID_INDEX;
        }
        self.get_uniform_location(program, name) as u32
    }

    fn uniform_block_binding(&self, program: u32, index: u32, binding: u32) {
        self.record("uniform_block_binding", &[program.into(), index.into(), binding.into()]);
    }

    fn uniform_1_i32(&self, location: i32, value: i32) {
        self.record("uniform_1_i32", &[location.into(), value.into()]);
    }

    fn uniform_1_u32(&self, location: i32, value: u32) {
        self.record("uniform_1_u32", &[location.into(), value.into()]);
    }

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instance_count: i32) {
        self.record(
            "draw_arrays_instanced",
            &[mode.into(), first.into(), count.into(), instance_count.into()],
        );
    }

    fn draw_elements_instanced(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32) {
        self.record(
            "draw_elements_instanced",
            &[mode.into(), count.into(), index_type.into(), offset.into(), instance_count.into()],
        );
    }

    fn draw_arrays_instanced_base_instance(&self, mode: u32, first: i32, count: i32, instance_count: i32, base_instance: u32) {
        self.record(
            "draw_arrays_instanced_base_instance",
            &[mode.into(), first.into(), count.into(), instance_count.into(), base_instance.into()],
        );
    }

    fn draw_elements_instanced_base_vertex(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32, base_vertex: i32) {
        self.record(
            "draw_elements_instanced_base_vertex",
            &[
                mode.into(),
                count.into(),
                index_type.into(),
                offset.into(),
                instance_count.into(),
                base_vertex.into(),
            ],
        );
    }

    fn draw_elements_instanced_base_vertex_base_instance(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32, base_vertex: i32, base_instance: u32) {
        self.record(
            "draw_elements_instanced_base_vertex_base_instance",
            &[
                mode.into(),
                count.into(),
                index_type.into(),
                offset.into(),
                instance_count.into(),
                base_vertex.into(),
                base_instance.into(),
            ],
        );
    }

    fn clip_control(&self, origin: u32, depth: u32) {
        self.record("clip_control", &[origin.into(), depth.into()]);
    }

    fn debug_message_insert(&self, source: u32, message_type: u32, id: u32, severity: u32, message: &str) {
        self.record_text(
            "debug_message_insert",
            &[source.into(), message_type.into(), id.into(), severity.into()],
            message,
        );
    }

    fn push_debug_group(&self, source: u32, id: u32, message: &str) {
        self.record_text("push_debug_group", &[source.into(), id.into()], message);
    }

    fn pop_debug_group(&self) {
        self.record("pop_debug_group", &[]);
    }
}

static_assertions::assert_impl_all!(RecordingFunctions: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_sequential() {
        let gl = RecordingFunctions::new();
        assert_eq!(gl.create_buffer(), 1);
        assert_eq!(gl.create_texture(), 2);
        assert_eq!(gl.calls_named("create_buffer")[0].arguments, vec![1]);
    }

    #[test]
    fn test_mapping_returns_buffer_storage() {
        let gl = RecordingFunctions::new();
        let buffer = gl.create_buffer();
        gl.bind_buffer(glow::COPY_WRITE_BUFFER, buffer);
        gl.buffer_data(glow::COPY_WRITE_BUFFER, 16, Some(&[7; 16]), glow::STATIC_DRAW);
        let pointer = gl.map_buffer_range(glow::COPY_WRITE_BUFFER, 4, 8, glow::MAP_READ_BIT);
        assert!(!pointer.is_null());
        // SAFETY: the recorded storage is 16 bytes and the mapping starts at byte 4.
        assert_eq!(unsafe { *pointer }, 7);
        assert!(gl.map_buffer_range(glow::COPY_WRITE_BUFFER, 12, 8, glow::MAP_READ_BIT).is_null());
    }

    #[test]
    fn test_missing_uniforms() {
        let gl = RecordingFunctions::new().with_missing_uniform("drawIdUniform");
        assert_eq!(gl.get_uniform_location(1, "drawIdUniform"), -1);
        assert_eq!(gl.get_uniform_block_index(1, "drawIdUniform"), INVALID_INDEX);
        assert_eq!(gl.get_uniform_location(1, "AlbedoMap"), 0);
        assert_eq!(gl.get_uniform_location(1, "AlbedoMap"), 0);
        assert_eq!(gl.get_uniform_location(1, "NormalMap"), 1);
    }
}
