/*!

This is the long-form manual for `community_scores` and `dinnervote`.

## Scoring

Each team scores every other team once, with one value per category
(by default `sabor`, `presentacion`, `creatividad`, from 0 to 10).

For every team and category, the category score is the mean of the points
received in that category. A category that nobody has scored yet counts as 0.
The overall score (`Media Total`) is the mean of the category scores. It is
**not** the mean of all the points received: a category with many votes does
not weigh more than a category with a single vote.

All the teams with the best overall score are announced as winners. No winner
is announced while every team is still at 0.

## Configuration

`dinnervote` reads an optional JSON file passed with `--config`:

```json
{
  "title": "Cena por comunidades",
  "teams": ["Maria Elvira", "Pablo, Alejandra", "Javi, Jorge"],
  "categories": ["sabor", "presentacion", "creatividad"],
  "voteFile": "votos.csv",
  "refreshIntervalMs": 1000,
  "rules": { "minPoints": 0, "maxPoints": 10, "defaultPoints": 5 }
}
```

Every key is optional. A relative `voteFile` is relative to the directory of
the configuration file.

## Vote file

The votes are stored in a CSV file with the header
`votante,evaluado,categoria,puntos`. It is created when missing. The file is
read again for every command, so it can be shared by several terminals
during the event. There is no locking: two submissions at the very same time
may overwrite each other.

## Commands

```bash
dinnervote init
dinnervote status --voter "Javi, Jorge"
dinnervote vote --voter "Javi, Jorge" --evaluated "Maria Elvira" \
    --score sabor=8 --score presentacion=7 --score creatividad=9
dinnervote results --charts
dinnervote results --format json --out summary.json
dinnervote watch --interval-ms 2000
dinnervote export --raw votos-copia.csv --summary resumen.csv
```

A category left out of `vote` gets the default value (5).

*/
