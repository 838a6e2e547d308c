use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::container::{read_artifact, Artifact, ArtifactWriter};
use crate::error::{Error, Result};
use crate::huffman::{HuffmanDecoder, HuffmanEncoder};
use crate::{CodecConfig, CodecStats};

/// File-level compress/decompress built on the in-memory codec
pub struct FileCodec {
    config: CodecConfig,
}

impl FileCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress the text file at `source` next to itself.
    ///
    /// Returns the artifact path (source path plus the artifact suffix).
    pub fn compress_file(&self, source: &Path) -> Result<(PathBuf, CodecStats)> {
        let text = self.read_source(source)?;
        let output_path = self.config.artifact_path(source);
        if same_path(source, &output_path) {
            return Err(Error::ArtifactWrite { path: output_path, source: overwrites_input() });
        }

        let encoded = HuffmanEncoder::new(self.config.num_threads).encode(&text)?;

        let output_bytes =
            write_atomically(&output_path, self.config.buffer_size, |writer| {
                ArtifactWriter::new(writer).write_artifact(&encoded.artifact)
            })
            .map_err(|e| match e {
                Error::Io(source) => Error::ArtifactWrite { path: output_path.clone(), source },
                other => other,
            })?;

        info!("Compressed {} -> {}", source.display(), output_path.display());

        let stats = CodecStats {
            input_bytes: text.len() as u64,
            output_bytes,
            distinct_symbols: encoded.artifact.table.len(),
            encoded_bits: encoded.encoded_bits as u64,
            padding_bits: encoded.padding,
        };
        Ok((output_path, stats))
    }

    /// Decompress the artifact at `artifact_path` next to itself.
    ///
    /// Returns the text path (artifact suffix replaced by the decompressed
    /// suffix).
    pub fn decompress_file(&self, artifact_path: &Path) -> Result<(PathBuf, CodecStats)> {
        let (artifact, input_bytes) = self.read_artifact_file(artifact_path)?;
        let output_path = self.config.decompressed_path(artifact_path);
        if same_path(artifact_path, &output_path) {
            return Err(Error::OutputWrite { path: output_path, source: overwrites_input() });
        }

        let text = HuffmanDecoder::decode_artifact(&artifact)?;

        write_atomically(&output_path, self.config.buffer_size, |writer| {
            writer.write_all(text.as_bytes())?;
            Ok(())
        })
        .map_err(|e| match e {
            Error::Io(source) => Error::OutputWrite { path: output_path.clone(), source },
            other => other,
        })?;

        info!("Decompressed {} -> {}", artifact_path.display(), output_path.display());

        let encoded_bits = (artifact.payload.len().saturating_sub(1) * 8)
            .saturating_sub(artifact.payload.first().copied().unwrap_or(0) as usize);
        let stats = CodecStats {
            input_bytes,
            output_bytes: text.len() as u64,
            distinct_symbols: artifact.table.len(),
            encoded_bits: encoded_bits as u64,
            padding_bits: artifact.payload.first().copied().unwrap_or(0),
        };
        Ok((output_path, stats))
    }

    /// Read and validate an artifact file, returning it with its size in bytes
    pub fn read_artifact_file(&self, path: &Path) -> Result<(Artifact, u64)> {
        let read_error =
            |source: io::Error| Error::ArtifactRead { path: path.to_path_buf(), source };

        let file = File::open(path).map_err(read_error)?;
        let mut data = Vec::new();
        BufReader::with_capacity(self.config.buffer_size, file)
            .read_to_end(&mut data)
            .map_err(read_error)?;
        debug!("Read {} artifact bytes from {}", data.len(), path.display());

        let artifact = read_artifact(data.as_slice())?;
        Ok((artifact, data.len() as u64))
    }

    fn read_source(&self, path: &Path) -> Result<String> {
        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
            _ => Error::SourceRead { path: path.to_path_buf(), source },
        })?;

        let mut text = String::new();
        BufReader::with_capacity(self.config.buffer_size, file)
            .read_to_string(&mut text)
            .map_err(|source| Error::SourceRead { path: path.to_path_buf(), source })?;
        debug!("Read {} bytes of text from {}", text.len(), path.display());
        Ok(text)
    }
}

impl Default for FileCodec {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

/// Compress `text` straight to artifact bytes
pub fn compress_to_vec(text: &str) -> Result<Vec<u8>> {
    HuffmanEncoder::default().encode(text)?.artifact.to_bytes()
}

/// Decode artifact bytes produced by [`compress_to_vec`]
pub fn decompress_from_slice(data: &[u8]) -> Result<String> {
    HuffmanDecoder::decode_artifact(&Artifact::from_bytes(data)?)
}

/// Whether `output` names the same file as `input`, comparing canonical forms
/// when both exist
fn same_path(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn overwrites_input() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "output path is the input file")
}

/// Write through a temporary file in the destination directory and rename it
/// into place once fully flushed. On error the temporary file is removed and
/// `path` is left untouched.
fn write_atomically<T>(
    path: &Path,
    buffer_size: usize,
    write: impl FnOnce(&mut dyn Write) -> Result<T>,
) -> Result<T> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    let value = {
        let mut writer = BufWriter::with_capacity(buffer_size, temp.as_file_mut());
        let value = write(&mut writer)?;
        writer.flush()?;
        value
    };
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(value)
}
