use candle_core::{DType, Tensor};

use talentdb_core::{Error, Result};

use crate::provider_err;

/// Mean over unmasked tokens, then L2-normalize: `[B,T,H] -> [B,H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    pool(hidden, attention_mask).map_err(provider_err)?.ok_or_else(|| {
        Error::EmbeddingProvider(format!("hidden state must be [B,T,H], got {:?}", hidden.dims()))
    })
}

fn pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Option<Tensor>> {
    let &[batch, _, hidden_dim] = hidden.dims() else {
        return Ok(None);
    };

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let mask_3d = mask.unsqueeze(2)?;
    let mask_broadcast = match mask_3d.broadcast_as(hidden.shape()) {
        Ok(m) => m,
        Err(_) => mask_3d.repeat((1, 1, hidden_dim))?,
    };
    let masked = (hidden * &mask_broadcast)?;
    let sum = masked.sum(1)?;
    let lengths = mask.sum(1)?.unsqueeze(1)?.to_dtype(sum.dtype())?;
    let mean = sum.broadcast_div(&lengths)?;
    let eps_val = match hidden.dtype() {
        DType::F16 => 1e-6f32,
        _ => 1e-12f32,
    };
    let eps = Tensor::new(&[eps_val], hidden.device())?.to_dtype(hidden.dtype())?.unsqueeze(0)?;
    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?.broadcast_add(&eps)?;
    let pooled = mean.broadcast_div(&norm)?;
    if pooled.dims() != [batch, hidden_dim] {
        return Ok(None);
    }
    Ok(Some(pooled))
}
