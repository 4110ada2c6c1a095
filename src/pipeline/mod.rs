//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the concrete engine or codec can be swapped without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ load ──▶ viewport ──▶ surface ──▶ render ──▶ encode ──▶ assemble
//! (base64)  (engine)  (scale)     (create)    (paint)    (png/jpeg) (record)
//!                                    │                       │
//!                                    └──── release ◀─────────┘
//! ```
//!
//! 1. [`input`]    — validate the request; nothing is allocated before this
//! 2. [`load`]     — decode the document and open its first page
//! 3. [`viewport`] — derive scale and pixel size from the desired width
//! 4. [`surface`]  — allocate the render target; released on every exit path
//! 5. [`render`]   — paint the page with image smoothing disabled
//! 6. [`encode`]   — compress with the format's tuning profile
//! 7. [`assemble`] — attach the base64 text form and final dimensions

pub mod assemble;
pub mod encode;
pub mod input;
pub mod load;
pub mod render;
pub mod surface;
pub mod viewport;
