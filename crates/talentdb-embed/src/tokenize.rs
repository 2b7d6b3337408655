use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

use talentdb_core::Result;

use crate::provider_err;

/// XLM-R pad token id.
const PAD_ID: u32 = 1;

/// Encode `text` into `[1, max_len]` id and mask tensors, truncating or padding.
pub fn tokenize_on_device(
    tokenizer: &Tokenizer,
    text: &str,
    max_len: usize,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    let enc = tokenizer
        .encode(text, true)
        .map_err(|e| provider_err(format!("tokenization failed: {e}")))?;
    let mut ids = enc.get_ids().to_vec();
    let mut mask = enc.get_attention_mask().to_vec();
    ids.resize(max_len, PAD_ID);
    mask.resize(max_len, 0);
    let input_ids = Tensor::from_iter(ids, device)
        .and_then(|t| t.reshape((1, max_len)))
        .map_err(provider_err)?;
    let attention_mask = Tensor::from_iter(mask, device)
        .and_then(|t| t.reshape((1, max_len)))
        .map_err(provider_err)?;
    Ok((input_ids, attention_mask))
}
