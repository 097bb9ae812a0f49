//! The command buffer: an append-only chain of packets.
//!
//! # Memory Layout
//!
//! Packets live back to back in one 8-byte aligned byte buffer. Each packet
//! starts with a [`PacketHeader`], followed by the command struct, followed by
//! optional auxiliary bytes:
//!
//! ```text
//! +-------------------+----------------+---------+----------------+
//! | header (16 bytes) | command (POD)  | padding | auxiliary data |
//! +-------------------+----------------+---------+----------------+
//! ^ packet offset                                ^ auxiliary offset
//! ```
//!
//! Packets are linked by byte offsets, never pointers; the last packet's next
//! offset is [`LAST_PACKET`]. Resources and nested command buffers are recorded
//! as slot indices into a side table of weak references, so a command buffer
//! never keeps anything alive.

use std::sync::{Arc, Weak};

use bytemuck::{Pod, Zeroable};

use crate::renderer::Renderer;
use crate::resources::{Resource, WeakResource};

use super::{Command, CommandDispatchFunctionIndex};

/// Next-packet offset of the last packet in a chain.
pub const LAST_PACKET: u32 = u32::MAX;

const ALIGNMENT: usize = 8;

fn align(size: usize) -> usize {
    size.div_ceil(ALIGNMENT) * ALIGNMENT
}

/// Header in front of every packet.
///
/// # Memory Layout
///
/// - Total size: 16 bytes
/// - Alignment: 4 bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PacketHeader {
    /// Byte offset of the next packet, or [`LAST_PACKET`].
    pub next_packet_offset: u32,
    /// Index into the backend dispatch table.
    pub dispatch_function_index: u32,
    /// Byte offset of the auxiliary data, relative to the packet start.
    pub auxiliary_memory_offset: u32,
    /// Size of the auxiliary data in bytes.
    pub auxiliary_memory_size: u32,
}

const HEADER_SIZE: usize = std::mem::size_of::<PacketHeader>();

/// Index of a recorded resource or command buffer reference.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct ResourceSlot(pub u32);

impl ResourceSlot {
    /// No reference recorded.
    pub const NONE: Self = Self(u32::MAX);

    /// Whether no reference is recorded.
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for ResourceSlot {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone)]
enum RecordedReference {
    Resource(WeakResource),
    CommandBuffer(Weak<CommandBuffer>),
}

/// A decoded view of one packet.
#[derive(Debug, Clone, Copy)]
pub struct CommandPacket<'a> {
    offset: u32,
    header: PacketHeader,
    command: &'a [u8],
    auxiliary: &'a [u8],
}

impl<'a> CommandPacket<'a> {
    /// Byte offset of the packet in its command buffer.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Packet header.
    pub fn header(&self) -> &PacketHeader {
        &self.header
    }

    /// Dispatch function index, if it names a known command kind.
    pub fn dispatch_function_index(&self) -> Option<CommandDispatchFunctionIndex> {
        CommandDispatchFunctionIndex::from_u32(self.header.dispatch_function_index)
    }

    /// The command, if the packet holds a `C`.
    pub fn command<C: Command>(&self) -> Option<&'a C> {
        if self.header.dispatch_function_index != C::DISPATCH_FUNCTION_INDEX as u32 {
            return None;
        }
        let bytes = self.command.get(..std::mem::size_of::<C>())?;
        bytemuck::try_from_bytes(bytes).ok()
    }

    /// Auxiliary bytes following the command.
    pub fn auxiliary(&self) -> &'a [u8] {
        self.auxiliary
    }
}

/// Iterator over the packets of a command buffer, in append order.
#[derive(Debug, Clone)]
pub struct Packets<'a> {
    bytes: &'a [u8],
    next: u32,
}

impl<'a> Iterator for Packets<'a> {
    type Item = CommandPacket<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == LAST_PACKET {
            return None;
        }
        let offset = self.next as usize;
        let header: PacketHeader = *bytemuck::from_bytes(self.bytes.get(offset..offset + HEADER_SIZE)?);
        self.next = header.next_packet_offset;
        let auxiliary_start = offset + header.auxiliary_memory_offset as usize;
        let auxiliary_end = auxiliary_start + header.auxiliary_memory_size as usize;
        Some(CommandPacket {
            offset: offset as u32,
            header,
            command: self.bytes.get(offset + HEADER_SIZE..auxiliary_start)?,
            auxiliary: self.bytes.get(auxiliary_start..auxiliary_end)?,
        })
    }
}

/// Append-only buffer of commands.
///
/// Commands are recorded with the `create` functions of the command structs
/// and executed by submitting the buffer to a renderer. Submission only reads
/// the buffer, so a buffer can be submitted any number of times until it is
/// cleared.
///
/// # Example
///
/// ```ignore
/// let mut command_buffer = CommandBuffer::new();
/// SetGraphicsRenderTarget::create(&mut command_buffer, Some(&render_target));
/// ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR_DEPTH, [0.5, 0.5, 0.5, 1.0], 1.0, 0);
/// command_buffer.submit_to_renderer(&mut renderer);
/// ```
#[derive(Debug, Default)]
pub struct CommandBuffer {
    storage: Vec<u64>,
    size: usize,
    last_packet_offset: Option<usize>,
    number_of_commands: u32,
    references: Vec<RecordedReference>,
}

impl CommandBuffer {
    /// Create an empty command buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty command buffer with room for `capacity` bytes of packets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity.div_ceil(ALIGNMENT)),
            ..Self::default()
        }
    }

    /// Whether no command has been recorded.
    pub fn is_empty(&self) -> bool {
        self.number_of_commands == 0
    }

    /// Number of recorded commands.
    pub fn number_of_commands(&self) -> u32 {
        self.number_of_commands
    }

    /// Number of bytes used by packets.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bytes that can be used without reallocating.
    pub fn capacity(&self) -> usize {
        self.storage.capacity() * ALIGNMENT
    }

    /// Remove every command, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.size = 0;
        self.last_packet_offset = None;
        self.number_of_commands = 0;
        self.references.clear();
    }

    /// Raw packet bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.storage)[..self.size]
    }

    /// Iterate the packets in append order.
    pub fn packets(&self) -> Packets<'_> {
        Packets {
            bytes: self.as_bytes(),
            next: if self.is_empty() { LAST_PACKET } else { 0 },
        }
    }

    /// Append a command followed by a copy of `auxiliary`.
    pub fn add_command<C: Command>(&mut self, command: C, auxiliary: &[u8]) {
        self.add_command_with_auxiliary_size(command, auxiliary.len() as u32)
            .copy_from_slice(auxiliary);
    }

    /// Append a command followed by `auxiliary_size` zeroed bytes.
    ///
    /// Returns the auxiliary bytes so the caller can fill them in.
    pub fn add_command_with_auxiliary_size<C: Command>(
        &mut self,
        command: C,
        auxiliary_size: u32,
    ) -> &mut [u8] {
        debug_assert!(std::mem::align_of::<C>() <= ALIGNMENT);
        let packet_offset = self.size;
        let command_size = std::mem::size_of::<C>();
        let auxiliary_offset = align(HEADER_SIZE + command_size);
        let packet_size = align(auxiliary_offset + auxiliary_size as usize);
        debug_assert!(packet_offset + packet_size < LAST_PACKET as usize);

        self.size += packet_size;
        self.storage.resize(self.size / ALIGNMENT, 0);
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.storage);

        if let Some(last_packet_offset) = self.last_packet_offset {
            let previous: &mut PacketHeader =
                bytemuck::from_bytes_mut(&mut bytes[last_packet_offset..last_packet_offset + HEADER_SIZE]);
            previous.next_packet_offset = packet_offset as u32;
        }
        self.last_packet_offset = Some(packet_offset);
        self.number_of_commands += 1;

        let header = PacketHeader {
            next_packet_offset: LAST_PACKET,
            dispatch_function_index: C::DISPATCH_FUNCTION_INDEX as u32,
            auxiliary_memory_offset: auxiliary_offset as u32,
            auxiliary_memory_size: auxiliary_size,
        };
        bytes[packet_offset..packet_offset + HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&header));
        let command_start = packet_offset + HEADER_SIZE;
        bytes[command_start..command_start + command_size]
            .copy_from_slice(bytemuck::bytes_of(&command));

        let auxiliary_start = packet_offset + auxiliary_offset;
        &mut bytes[auxiliary_start..auxiliary_start + auxiliary_size as usize]
    }

    /// Record a non-owning resource reference.
    pub fn record_resource(&mut self, resource: &Resource) -> ResourceSlot {
        self.push_reference(RecordedReference::Resource(resource.downgrade()))
    }

    /// Record an optional non-owning resource reference.
    pub fn record_optional_resource(&mut self, resource: Option<Resource>) -> ResourceSlot {
        match resource {
            Some(resource) => self.record_resource(&resource),
            None => ResourceSlot::NONE,
        }
    }

    /// Record a non-owning reference to another command buffer.
    pub fn record_command_buffer(&mut self, command_buffer: &Arc<CommandBuffer>) -> ResourceSlot {
        self.push_reference(RecordedReference::CommandBuffer(Arc::downgrade(command_buffer)))
    }

    fn push_reference(&mut self, reference: RecordedReference) -> ResourceSlot {
        self.references.push(reference);
        ResourceSlot(self.references.len() as u32 - 1)
    }

    /// Look up a recorded resource.
    ///
    /// Returns `None` for [`ResourceSlot::NONE`] and, with a warning, for a
    /// resource destroyed before submission.
    pub fn resource(&self, slot: ResourceSlot) -> Option<Resource> {
        if slot.is_none() {
            return None;
        }
        match self.references.get(slot.0 as usize) {
            Some(RecordedReference::Resource(resource)) => {
                let resource = resource.upgrade();
                if resource.is_none() {
                    log::warn!("Command references a resource destroyed before submission, skipped");
                }
                resource
            }
            _ => {
                log::error!("Invalid resource slot {}", slot.0);
                None
            }
        }
    }

    /// Look up a binding that may legitimately be empty.
    ///
    /// The outer `None` means the command must be skipped; `Some(None)` means
    /// the command unbinds.
    pub fn resolve_binding<T>(&self, slot: ResourceSlot) -> Option<Option<Arc<T>>>
    where
        Arc<T>: TryFrom<Resource, Error = Resource>,
    {
        if slot.is_none() {
            return Some(None);
        }
        self.resolve_required(slot).map(Some)
    }

    /// Look up a resource that must be present and of type `T`.
    pub fn resolve_required<T>(&self, slot: ResourceSlot) -> Option<Arc<T>>
    where
        Arc<T>: TryFrom<Resource, Error = Resource>,
    {
        let resource = self.resource(slot)?;
        match Arc::<T>::try_from(resource) {
            Ok(resource) => Some(resource),
            Err(resource) => {
                log::error!(
                    "Command references a {:?} where another resource type is expected",
                    resource.resource_type()
                );
                None
            }
        }
    }

    /// Look up a recorded command buffer.
    pub fn command_buffer(&self, slot: ResourceSlot) -> Option<Arc<CommandBuffer>> {
        match self.references.get(slot.0 as usize) {
            Some(RecordedReference::CommandBuffer(command_buffer)) => {
                let command_buffer = command_buffer.upgrade();
                if command_buffer.is_none() {
                    log::warn!("Executed command buffer was destroyed before submission, skipped");
                }
                command_buffer
            }
            _ => {
                log::error!("Invalid command buffer slot {}", slot.0);
                None
            }
        }
    }

    /// Execute every packet through the renderer's dispatch table.
    ///
    /// An empty buffer is a no-op. Nested command buffers are executed in
    /// place, depth first.
    pub fn submit_to_renderer<R: Renderer>(&self, renderer: &mut R) {
        for packet in self.packets() {
            match R::DISPATCH_TABLE.get(packet.header().dispatch_function_index as usize) {
                Some(function) => function(self, &packet, renderer),
                None => log::error!(
                    "Invalid dispatch function index {} at packet offset {}",
                    packet.header().dispatch_function_index,
                    packet.offset()
                ),
            }
        }
    }

    /// Execute every packet, then clear the buffer.
    pub fn submit_to_renderer_and_clear<R: Renderer>(&mut self, renderer: &mut R) {
        self.submit_to_renderer(renderer);
        self.clear();
    }
}

static_assertions::assert_impl_all!(CommandBuffer: Send, Sync);
static_assertions::const_assert_eq!(HEADER_SIZE, 16);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{EndDebugEvent, SetDebugMarker, SetGraphicsViewports};
    use crate::types::Viewport;

    #[test]
    fn test_empty_buffer_has_no_packets() {
        let command_buffer = CommandBuffer::new();
        assert!(command_buffer.is_empty());
        assert_eq!(command_buffer.packets().count(), 0);
    }

    #[test]
    fn test_packet_chain_links_in_order() {
        let mut command_buffer = CommandBuffer::new();
        SetDebugMarker::create(&mut command_buffer, "first");
        EndDebugEvent::create(&mut command_buffer);
        SetGraphicsViewports::create(&mut command_buffer, &[Viewport::from_dimensions(4, 4)]);

        let packets: Vec<_> = command_buffer.packets().collect();
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].header().next_packet_offset, packets[1].offset());
        assert_eq!(packets[1].header().next_packet_offset, packets[2].offset());
        assert_eq!(packets[2].header().next_packet_offset, LAST_PACKET);
        assert!(packets.iter().all(|packet| packet.offset() as usize % ALIGNMENT == 0));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut command_buffer = CommandBuffer::with_capacity(1024);
        for _ in 0..16 {
            SetDebugMarker::create(&mut command_buffer, "marker");
        }
        let capacity = command_buffer.capacity();
        command_buffer.clear();
        assert!(command_buffer.is_empty());
        assert_eq!(command_buffer.size(), 0);
        assert_eq!(command_buffer.capacity(), capacity);
    }

    #[test]
    fn test_auxiliary_memory_is_zeroed_and_writable() {
        let mut command_buffer = CommandBuffer::new();
        let auxiliary = command_buffer.add_command_with_auxiliary_size(EndDebugEvent, 5);
        assert_eq!(auxiliary, &[0; 5]);
        auxiliary.copy_from_slice(b"hello");
        let packet = command_buffer.packets().next().unwrap();
        assert_eq!(packet.auxiliary(), b"hello");
    }

    #[test]
    fn test_command_type_is_checked() {
        let mut command_buffer = CommandBuffer::new();
        EndDebugEvent::create(&mut command_buffer);
        let packet = command_buffer.packets().next().unwrap();
        assert!(packet.command::<EndDebugEvent>().is_some());
        assert!(packet.command::<SetGraphicsViewports>().is_none());
    }
}
