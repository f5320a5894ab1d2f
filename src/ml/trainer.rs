// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Training runs on Autodiff<Wgpu> for gradients; model.valid()
// hands back the same weights on the inner Wgpu backend for a
// dropout-free, gradient-free validation pass. Validation always
// uses teacher-forcing ratio 0 — the model must consume its own
// predictions, matching how it is used at inference time.
//
// The loop is generic over TranslationModel so both the GRU and
// LSTM variants train through the same code path.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    grad_clipping::GradientClippingConfig,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::application::train_use_case::{ModelArch, TrainConfig};
use crate::data::{batcher::TranslationBatcher, dataset::TranslationDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::infra::vocab_store::PAD_ID;
use crate::ml::gru::GruSeq2SeqConfig;
use crate::ml::lstm::LstmSeq2SeqConfig;
use crate::ml::seq2seq::{sequence_loss, TranslationModel};

type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: TranslationDataset,
    val_dataset:   TranslationDataset,
    ckpt_manager:  CheckpointManager,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    match cfg.arch {
        ModelArch::Gru => {
            let model = GruSeq2SeqConfig::new(
                cfg.src_vocab_size, cfg.trg_vocab_size,
                cfg.emb_dim, cfg.hid_dim, cfg.dropout,
            )
            .init::<MyBackend>(&device);
            tracing::info!("GRU model ready: emb={}, hid={}", cfg.emb_dim, cfg.hid_dim);
            train_loop(model, cfg, train_dataset, val_dataset, ckpt_manager, device)
        }
        ModelArch::Lstm => {
            let model = LstmSeq2SeqConfig::new(
                cfg.src_vocab_size, cfg.trg_vocab_size,
                cfg.emb_dim, cfg.hid_dim, cfg.num_layers, cfg.dropout,
            )
            .init::<MyBackend>(&device);
            tracing::info!(
                "LSTM model ready: {} layers, emb={}, hid={}",
                cfg.num_layers, cfg.emb_dim, cfg.hid_dim,
            );
            train_loop(model, cfg, train_dataset, val_dataset, ckpt_manager, device)
        }
    }
}

fn train_loop<M>(
    mut model:     M,
    cfg:           &TrainConfig,
    train_dataset: TranslationDataset,
    val_dataset:   TranslationDataset,
    ckpt_manager:  CheckpointManager,
    device:        burn::backend::wgpu::WgpuDevice,
) -> Result<()>
where
    M: TranslationModel<MyBackend> + AutodiffModule<MyBackend>,
    M::InnerModule: TranslationModel<MyInnerBackend>,
{
    // Adam with the gradient norm clipped — recurrent nets blow up
    // on long sequences without it.
    let optim_cfg = AdamConfig::new()
        .with_epsilon(1e-8)
        .with_grad_clipping(Some(GradientClippingConfig::Norm(cfg.clip_norm)));
    let mut optim = optim_cfg.init();

    // Seeded so a training run can be reproduced exactly: the same
    // shuffle order and the same teacher-forcing coin flips.
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

    let train_batcher = TranslationBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // Validation on the inner backend — no autodiff overhead.
    let val_batcher = TranslationBatcher::<MyInnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let scores = model.forward(
                batch.source,
                batch.target.clone(),
                cfg.teacher_forcing,
                &mut rng,
            );
            let loss = sequence_loss(scores, batch.target, PAD_ID);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // Teacher forcing off: every step consumes the model's own argmax.
        let model_valid = model.valid();

        let mut val_loss_sum   = 0.0f64;
        let mut val_batches    = 0usize;
        let mut correct_tokens = 0i64;
        let mut total_tokens   = 0i64;

        for batch in val_loader.iter() {
            let scores = model_valid.forward(
                batch.source,
                batch.target.clone(),
                0.0,
                &mut rng,
            );

            let batch_loss: f64 = sequence_loss(scores.clone(), batch.target.clone(), PAD_ID)
                .into_scalar()
                .elem::<f64>();
            val_loss_sum += batch_loss;
            val_batches  += 1;

            // Token accuracy over real positions — position 0 and padding
            // never count.
            let [b, l, v] = scores.dims();
            let preds = scores
                .slice([0..b, 1..l, 0..v])
                .argmax(2)
                .reshape([b * (l - 1)]);
            let truth = batch.target
                .slice([0..b, 1..l])
                .reshape([b * (l - 1)]);
            let mask = truth.clone().not_equal_elem(PAD_ID as i32);

            correct_tokens += (preds.equal(truth).int() * mask.clone().int())
                .sum()
                .into_scalar()
                .elem::<i64>();
            total_tokens += mask.int().sum().into_scalar().elem::<i64>();
        }

        let avg_val_loss = if val_batches  > 0 { val_loss_sum / val_batches as f64 } else { f64::NAN };
        let val_acc      = if total_tokens > 0 { correct_tokens as f64 / total_tokens as f64 } else { 0.0 };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} (ppl {:.1}) | val_loss={:.4} (ppl {:.1}) | val_acc={:.1}%",
            epoch, cfg.epochs,
            avg_train_loss, avg_train_loss.exp(),
            avg_val_loss,   avg_val_loss.exp(),
            val_acc * 100.0,
        );

        metrics.log(&EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, val_acc))?;

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(())
}
